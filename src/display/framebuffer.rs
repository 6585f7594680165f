use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, Size},
};

pub const PANEL_WIDTH: usize = 200;
pub const PANEL_HEIGHT: usize = 200;
pub const FRAMEBUFFER_BYTES: usize = PANEL_WIDTH * PANEL_HEIGHT / 8;

/// 1bpp image in the panel's RAM layout: rows top to bottom, MSB is the
/// leftmost pixel, a set bit is white. `BinaryColor::On` draws ink.
pub struct FrameBuffer {
    bytes: [u8; FRAMEBUFFER_BYTES],
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0xFF; FRAMEBUFFER_BYTES],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, ink: bool) {
        if x >= PANEL_WIDTH || y >= PANEL_HEIGHT {
            return;
        }
        let idx = (y * PANEL_WIDTH + x) / 8;
        let mask = 0x80u8 >> (x % 8);
        if ink {
            self.bytes[idx] &= !mask;
        } else {
            self.bytes[idx] |= mask;
        }
    }

    /// True where ink was drawn. Out-of-bounds reads as paper.
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        if x >= PANEL_WIDTH || y >= PANEL_HEIGHT {
            return false;
        }
        let idx = (y * PANEL_WIDTH + x) / 8;
        self.bytes[idx] & (0x80u8 >> (x % 8)) == 0
    }

    pub fn ink_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_zeros() as usize).sum()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<It>(&mut self, pixels: It) -> Result<(), Self::Error>
    where
        It: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set_pixel(point.x as usize, point.y as usize, color == BinaryColor::On);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        if color == BinaryColor::On {
            self.bytes.fill(0x00);
        } else {
            self.bytes.fill(0xFF);
        }
        Ok(())
    }
}
