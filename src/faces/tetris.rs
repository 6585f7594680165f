//! Time as stacked tetromino-style block digits, with steps, battery volts and
//! the date in small digits down the side panel.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use u8g2_fonts::{fonts, types::VerticalPosition, FontRenderer};

use super::{text::draw_text, WatchInputs};

pub(crate) const BIG_DIGIT_WIDTH: i32 = 40;
pub(crate) const BIG_DIGIT_HEIGHT: i32 = 60;
pub(crate) const BLOCK: i32 = 10;
pub(crate) const HOUR_TENS: Point = Point::new(25, 20);
pub(crate) const HOUR_UNITS: Point = Point::new(75, 20);
pub(crate) const MINUTE_TENS: Point = Point::new(25, 110);
pub(crate) const MINUTE_UNITS: Point = Point::new(75, 110);

pub(crate) const SMALL_DIGIT: i32 = 8;
pub(crate) const SMALL_PITCH: i32 = 10;
/// Units digit of the step count; higher digits step left by `SMALL_PITCH`.
pub(crate) const STEPS_UNITS: Point = Point::new(191, 41);
pub(crate) const STEPS_MAX_DIGITS: u32 = 7;
pub(crate) const VOLTS_ORIGIN: Point = Point::new(161, 81);
pub(crate) const DATE_ORIGIN: Point = Point::new(151, 111);

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
const SMALL_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_5x8_tf>();

/// Rows top to bottom, bit 3 is the leftmost block.
const BLOCK_DIGITS: [[u8; 6]; 10] = [
    [0b1111, 0b1001, 0b1001, 0b1001, 0b1001, 0b1111],
    [0b0110, 0b0010, 0b0010, 0b0010, 0b0010, 0b0111],
    [0b1111, 0b0001, 0b0001, 0b1111, 0b1000, 0b1111],
    [0b1111, 0b0001, 0b0111, 0b0001, 0b0001, 0b1111],
    [0b1001, 0b1001, 0b1111, 0b0001, 0b0001, 0b0001],
    [0b1111, 0b1000, 0b1111, 0b0001, 0b0001, 0b1111],
    [0b1111, 0b1000, 0b1111, 0b1001, 0b1001, 0b1111],
    [0b1111, 0b0001, 0b0001, 0b0010, 0b0010, 0b0010],
    [0b1111, 0b1001, 0b1111, 0b1001, 0b1001, 0b1111],
    [0b1111, 0b1001, 0b1111, 0b0001, 0b0001, 0b1111],
];

pub(crate) fn block_present(digit: u8, col: i32, row: i32) -> bool {
    let pattern = BLOCK_DIGITS[usize::from(digit % 10)][row as usize];
    pattern & (0b1000 >> col) != 0
}

pub(crate) fn render<T>(inputs: &WatchInputs, target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    draw_frame(target)?;

    let time = &inputs.time;
    draw_block_digit(target, HOUR_TENS, time.hour / 10)?;
    draw_block_digit(target, HOUR_UNITS, time.hour % 10)?;
    draw_block_digit(target, MINUTE_TENS, time.minute / 10)?;
    draw_block_digit(target, MINUTE_UNITS, time.minute % 10)?;

    draw_steps(target, inputs.steps)?;

    let centivolts = inputs.battery_mv / 10;
    let volts = VOLTS_ORIGIN;
    draw_small_digit(target, volts, (centivolts / 100 % 10) as u8)?;
    draw_small_digit(target, volts + Point::new(SMALL_PITCH, 0), (centivolts / 10 % 10) as u8)?;
    draw_small_digit(target, volts + Point::new(2 * SMALL_PITCH, 0), (centivolts % 10) as u8)?;
    Rectangle::new(volts + Point::new(SMALL_DIGIT, SMALL_DIGIT - 2), Size::new(2, 2))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;

    let date = DATE_ORIGIN;
    if time.month >= 10 {
        draw_small_digit(target, date, time.month / 10)?;
    }
    draw_small_digit(target, date + Point::new(SMALL_PITCH, 0), time.month % 10)?;
    draw_small_digit(target, date + Point::new(2 * SMALL_PITCH, 0), time.day / 10)?;
    draw_small_digit(target, date + Point::new(3 * SMALL_PITCH, 0), time.day % 10)
}

/// Right-aligned at `STEPS_UNITS`; a digit is shown once the count reaches
/// its place value, so 1000 shows four digits.
fn draw_steps<T>(target: &mut T, steps: u32) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    let mut place = 1u32;
    for idx in 0..STEPS_MAX_DIGITS {
        if idx > 0 && steps < place {
            break;
        }
        let origin = STEPS_UNITS - Point::new(idx as i32 * SMALL_PITCH, 0);
        draw_small_digit(target, origin, (steps / place % 10) as u8)?;
        place = place.saturating_mul(10);
    }
    Ok(())
}

fn draw_frame<T>(target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::new(15, 10), Size::new(110, 170))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;
    for (label, y) in [("STEPS", 30), ("VOLT", 70), ("DATE", 100)] {
        draw_text(
            target,
            &SMALL_FONT,
            label,
            Point::new(131, y),
            VerticalPosition::Top,
            BinaryColor::On,
        )?;
    }
    Ok(())
}

fn draw_block_digit<T>(target: &mut T, origin: Point, digit: u8) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    let outline = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    for row in 0..BIG_DIGIT_HEIGHT / BLOCK {
        for col in 0..BIG_DIGIT_WIDTH / BLOCK {
            if !block_present(digit, col, row) {
                continue;
            }
            let cell = origin + Point::new(col * BLOCK, row * BLOCK);
            Rectangle::new(cell, Size::new(9, 9))
                .into_styled(outline)
                .draw(target)?;
            Rectangle::new(cell + Point::new(3, 3), Size::new(3, 3))
                .into_styled(fill)
                .draw(target)?;
        }
    }
    Ok(())
}

fn draw_small_digit<T>(target: &mut T, origin: Point, digit: u8) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    draw_text(
        target,
        &SMALL_FONT,
        DIGITS[usize::from(digit % 10)],
        origin,
        VerticalPosition::Top,
        BinaryColor::On,
    )
}
