mod framebuffer;
mod ssd1681;
#[cfg(test)]
mod tests;

pub use framebuffer::{FrameBuffer, FRAMEBUFFER_BYTES, PANEL_HEIGHT, PANEL_WIDTH};
pub use ssd1681::{DisplayError, Ssd1681};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshMode {
    Full,
    Partial,
}

/// Partial refreshes leave ghosting behind, so every `full_every` updates
/// (and on the first update after power-on) the panel gets a full waveform.
/// `partial_count` is the retained number of partial refreshes since the
/// last full one.
pub fn next_refresh_mode(partial_count: &mut u8, full_every: u8, cold_boot: bool) -> RefreshMode {
    if cold_boot || full_every <= 1 || *partial_count >= full_every - 1 {
        *partial_count = 0;
        RefreshMode::Full
    } else {
        *partial_count += 1;
        RefreshMode::Partial
    }
}
