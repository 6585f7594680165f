//! Eight white bars on black, one filling every three hours. Even bars grow
//! up from the horizon, odd bars hang below it.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};

use super::WatchInputs;
use crate::calendar::CalendarTime;

pub(crate) const BARS: u8 = 8;
pub(crate) const BAR_WIDTH: u32 = 5;
pub(crate) const BAR_PITCH: i32 = 13;
pub(crate) const FIRST_BAR_X: i32 = 52;
pub(crate) const UPPER_BASE_Y: i32 = 96;
pub(crate) const LOWER_TOP_Y: i32 = 104;
pub(crate) const BAR_MAX: i32 = 48;
const HOURS_PER_BAR: f32 = 3.0;
const PIXELS_PER_HOUR: f32 = 16.0;

/// Height of bar `k` at `time`, in pixels.
pub(crate) fn bar_height(time: &CalendarTime, k: u8) -> i32 {
    let hours = f32::from(time.hour) + f32::from(time.minute) / 60.0;
    let raw = ((hours - HOURS_PER_BAR * f32::from(k)) * PIXELS_PER_HOUR) as i32;
    raw.clamp(0, BAR_MAX)
}

pub(crate) fn bar_rect(time: &CalendarTime, k: u8) -> Option<Rectangle> {
    let height = bar_height(time, k);
    if height == 0 {
        return None;
    }
    let x = FIRST_BAR_X + BAR_PITCH * i32::from(k);
    let y = if k % 2 == 0 {
        UPPER_BASE_Y - height
    } else {
        LOWER_TOP_Y
    };
    Some(Rectangle::new(
        Point::new(x, y),
        Size::new(BAR_WIDTH, height as u32),
    ))
}

pub(crate) fn render<T>(inputs: &WatchInputs, target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::On)?;
    // Horizon between the two rows of bars.
    let horizon_y = (UPPER_BASE_Y + LOWER_TOP_Y) / 2;
    let last_bar_end = FIRST_BAR_X + BAR_PITCH * i32::from(BARS - 1) + BAR_WIDTH as i32;
    Line::new(
        Point::new(FIRST_BAR_X - 4, horizon_y),
        Point::new(last_bar_end + 3, horizon_y),
    )
    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
    .draw(target)?;

    let fill = PrimitiveStyle::with_fill(BinaryColor::Off);
    for k in 0..BARS {
        if let Some(rect) = bar_rect(&inputs.time, k) {
            rect.into_styled(fill).draw(target)?;
        }
    }
    Ok(())
}
