//! Watch faces. Each face is a pure function of [`WatchInputs`] painted into
//! any 1-bit `DrawTarget`, normally the 200x200 [`crate::display::FrameBuffer`].

mod below;
mod pokemon;
mod tetris;
mod text;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};

use crate::{calendar::CalendarTime, sensors::battery_percent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchFace {
    Tetris,
    Pokemon,
    Below,
}

impl WatchFace {
    pub const DEFAULT: Self = Self::Tetris;

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tetris" => Some(Self::Tetris),
            "pokemon" => Some(Self::Pokemon),
            "below" => Some(Self::Below),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Tetris => "tetris",
            Self::Pokemon => "pokemon",
            Self::Below => "below",
        }
    }

    /// `WATCHY_FACE` at build time, falling back to the default face.
    pub fn from_env() -> Self {
        match option_env!("WATCHY_FACE") {
            None => Self::DEFAULT,
            Some(name) => Self::from_name(name).unwrap_or_else(|| {
                log::warn!("face: unknown WATCHY_FACE={} using={}", name, Self::DEFAULT.name());
                Self::DEFAULT
            }),
        }
    }
}

/// Everything a face may show for one minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchInputs {
    pub time: CalendarTime,
    /// Steps since local midnight.
    pub steps: u32,
    pub battery_mv: u16,
}

impl WatchInputs {
    pub fn battery_percent(&self) -> u8 {
        battery_percent(self.battery_mv)
    }
}

/// Paints the whole screen; previous contents are cleared first.
pub fn render<T>(face: WatchFace, inputs: &WatchInputs, target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    match face {
        WatchFace::Tetris => tetris::render(inputs, target),
        WatchFace::Pokemon => pokemon::render(inputs, target),
        WatchFace::Below => below::render(inputs, target),
    }
}
