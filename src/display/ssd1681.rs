//! SSD1681 controller as wired on the Watchy (GDEH0154D67 200x200 panel).
//! Blocking; one refresh per wake cycle.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{framebuffer::FrameBuffer, RefreshMode};

const CMD_DRIVER_OUTPUT: u8 = 0x01;
const CMD_DEEP_SLEEP: u8 = 0x10;
const CMD_DATA_ENTRY_MODE: u8 = 0x11;
const CMD_SW_RESET: u8 = 0x12;
const CMD_TEMP_SENSOR: u8 = 0x18;
const CMD_MASTER_ACTIVATION: u8 = 0x20;
const CMD_UPDATE_CONTROL_2: u8 = 0x22;
const CMD_WRITE_RAM_BW: u8 = 0x24;
const CMD_WRITE_RAM_PREVIOUS: u8 = 0x26;
const CMD_BORDER_WAVEFORM: u8 = 0x3C;
const CMD_RAM_X_RANGE: u8 = 0x44;
const CMD_RAM_Y_RANGE: u8 = 0x45;
const CMD_RAM_X_COUNTER: u8 = 0x4E;
const CMD_RAM_Y_COUNTER: u8 = 0x4F;

const UPDATE_FULL: u8 = 0xF7;
const UPDATE_PARTIAL: u8 = 0xFC;
const BORDER_FULL: u8 = 0x05;
const BORDER_PARTIAL: u8 = 0x80;
const DEEP_SLEEP_RETAIN_RAM: u8 = 0x01;

const BUSY_POLL_MS: u32 = 1;
/// Full refresh is roughly 2 s on this panel; anything past this is a hang.
const BUSY_TIMEOUT_MS: u32 = 5_000;
/// Keeps the SPI transfers below typical DMA chunk limits.
const RAM_CHUNK: usize = 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayError {
    Spi,
    Pin,
    BusyTimeout,
}

impl DisplayError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spi => "spi transfer failed",
            Self::Pin => "gpio access failed",
            Self::BusyTimeout => "panel stayed busy",
        }
    }
}

pub struct Ssd1681<SPI, DC, RST, BUSY, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
    delay: D,
}

impl<SPI, DC, RST, BUSY, D> Ssd1681<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: D) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            delay,
        }
    }

    /// Pushes `frame` and waits for the waveform to finish.
    pub fn show(&mut self, frame: &FrameBuffer, mode: RefreshMode) -> Result<(), DisplayError> {
        self.init(mode)?;
        if mode == RefreshMode::Full {
            self.write_ram(CMD_WRITE_RAM_PREVIOUS, frame)?;
        }
        self.write_ram(CMD_WRITE_RAM_BW, frame)?;
        let update = match mode {
            RefreshMode::Full => UPDATE_FULL,
            RefreshMode::Partial => UPDATE_PARTIAL,
        };
        self.command(CMD_UPDATE_CONTROL_2, &[update])?;
        self.command(CMD_MASTER_ACTIVATION, &[])?;
        self.wait_idle()?;
        if mode == RefreshMode::Partial {
            // Next partial diff is taken against this frame.
            self.write_ram(CMD_WRITE_RAM_PREVIOUS, frame)?;
        }
        Ok(())
    }

    /// Deep sleep with RAM retained; a hardware reset wakes the controller.
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_DEEP_SLEEP, &[DEEP_SLEEP_RETAIN_RAM])
    }

    pub fn release(self) -> (SPI, DC, RST, BUSY, D) {
        (self.spi, self.dc, self.rst, self.busy, self.delay)
    }

    fn init(&mut self, mode: RefreshMode) -> Result<(), DisplayError> {
        self.hw_reset()?;
        self.command(CMD_SW_RESET, &[])?;
        self.wait_idle()?;
        self.command(CMD_DRIVER_OUTPUT, &[0xC7, 0x00, 0x00])?;
        self.command(CMD_DATA_ENTRY_MODE, &[0x03])?;
        self.command(CMD_RAM_X_RANGE, &[0x00, 0x18])?;
        self.command(CMD_RAM_Y_RANGE, &[0x00, 0x00, 0xC7, 0x00])?;
        let border = match mode {
            RefreshMode::Full => BORDER_FULL,
            RefreshMode::Partial => BORDER_PARTIAL,
        };
        self.command(CMD_BORDER_WAVEFORM, &[border])?;
        self.command(CMD_TEMP_SENSOR, &[0x80])?;
        self.wait_idle()
    }

    fn hw_reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(10);
        Ok(())
    }

    fn write_ram(&mut self, cmd: u8, frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.command(CMD_RAM_X_COUNTER, &[0x00])?;
        self.command(CMD_RAM_Y_COUNTER, &[0x00, 0x00])?;
        self.command(cmd, &[])?;
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        for chunk in frame.as_bytes().chunks(RAM_CHUNK) {
            self.spi.write(chunk).map_err(|_| DisplayError::Spi)?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(&[cmd]).map_err(|_| DisplayError::Spi)?;
        if !data.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Pin)?;
            self.spi.write(data).map_err(|_| DisplayError::Spi)?;
        }
        Ok(())
    }

    /// BUSY is active high.
    fn wait_idle(&mut self) -> Result<(), DisplayError> {
        let mut waited_ms = 0u32;
        while self.busy.is_high().map_err(|_| DisplayError::Pin)? {
            if waited_ms >= BUSY_TIMEOUT_MS {
                return Err(DisplayError::BusyTimeout);
            }
            self.delay.delay_ms(BUSY_POLL_MS);
            waited_ms += BUSY_POLL_MS;
        }
        Ok(())
    }
}
