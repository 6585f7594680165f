use std::{cell::RefCell, convert::Infallible, rc::Rc, vec::Vec};

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point, Primitive, Size},
    primitives::{PrimitiveStyle, Rectangle},
    Drawable,
};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType as PinErrorType, InputPin, OutputPin},
    spi::{ErrorType as SpiErrorType, Operation, SpiDevice},
};

use super::*;

#[derive(Debug, PartialEq, Eq)]
enum Bus {
    Command(u8),
    Data(Vec<u8>),
    Reset(bool),
}

#[derive(Default)]
struct Wire {
    dc_high: bool,
    events: Vec<Bus>,
}

type SharedWire = Rc<RefCell<Wire>>;

struct FakeSpi(SharedWire);

impl SpiErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut wire = self.0.borrow_mut();
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                if wire.dc_high {
                    match wire.events.last_mut() {
                        Some(Bus::Data(existing)) => existing.extend_from_slice(bytes),
                        _ => wire.events.push(Bus::Data(bytes.to_vec())),
                    }
                } else {
                    for &b in bytes.iter() {
                        wire.events.push(Bus::Command(b));
                    }
                }
            }
        }
        Ok(())
    }
}

struct FakeDc(SharedWire);

impl PinErrorType for FakeDc {
    type Error = Infallible;
}

impl OutputPin for FakeDc {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().dc_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().dc_high = true;
        Ok(())
    }
}

struct FakeRst(SharedWire);

impl PinErrorType for FakeRst {
    type Error = Infallible;
}

impl OutputPin for FakeRst {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().events.push(Bus::Reset(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().events.push(Bus::Reset(true));
        Ok(())
    }
}

/// Reports busy for `busy_reads` polls, then idle; `None` is stuck busy.
struct FakeBusy {
    busy_reads: Option<u32>,
}

impl PinErrorType for FakeBusy {
    type Error = Infallible;
}

impl InputPin for FakeBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        match self.busy_reads.as_mut() {
            None => Ok(true),
            Some(0) => Ok(false),
            Some(n) => {
                *n -= 1;
                Ok(true)
            }
        }
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn panel(busy_reads: Option<u32>) -> (Ssd1681<FakeSpi, FakeDc, FakeRst, FakeBusy, NoDelay>, SharedWire) {
    let wire = SharedWire::default();
    let driver = Ssd1681::new(
        FakeSpi(wire.clone()),
        FakeDc(wire.clone()),
        FakeRst(wire.clone()),
        FakeBusy { busy_reads },
        NoDelay,
    );
    (driver, wire)
}

fn commands(wire: &SharedWire) -> Vec<u8> {
    wire.borrow()
        .events
        .iter()
        .filter_map(|event| match event {
            Bus::Command(cmd) => Some(*cmd),
            _ => None,
        })
        .collect()
}

fn data_after(wire: &SharedWire, cmd: u8) -> Vec<Vec<u8>> {
    let wire = wire.borrow();
    let mut out = Vec::new();
    for pair in wire.events.windows(2) {
        if let [Bus::Command(c), Bus::Data(bytes)] = pair {
            if *c == cmd {
                out.push(bytes.clone());
            }
        }
    }
    out
}

#[test]
fn new_framebuffer_is_blank_paper() {
    let frame = FrameBuffer::new();
    assert_eq!(frame.as_bytes().len(), FRAMEBUFFER_BYTES);
    assert!(frame.as_bytes().iter().all(|&b| b == 0xFF));
    assert_eq!(frame.ink_count(), 0);
}

#[test]
fn pixels_map_msb_first_with_ink_as_cleared_bit() {
    let mut frame = FrameBuffer::new();
    frame.set_pixel(0, 0, true);
    frame.set_pixel(9, 1, true);
    assert_eq!(frame.as_bytes()[0], 0x7F);
    assert_eq!(frame.as_bytes()[PANEL_WIDTH / 8 + 1], 0xBF);
    assert!(frame.is_ink(9, 1));
    frame.set_pixel(9, 1, false);
    assert!(!frame.is_ink(9, 1));
    assert_eq!(frame.ink_count(), 1);
}

#[test]
fn out_of_bounds_drawing_is_clipped() {
    let mut frame = FrameBuffer::new();
    Rectangle::new(Point::new(-5, 195), Size::new(10, 10))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut frame)
        .unwrap();
    assert_eq!(frame.ink_count(), 5 * 5);
    assert!(frame.is_ink(0, 199));
    assert!(!frame.is_ink(200, 199));
}

#[test]
fn clear_fills_whole_panel() {
    let mut frame = FrameBuffer::new();
    frame.clear(BinaryColor::On).unwrap();
    assert_eq!(frame.ink_count(), PANEL_WIDTH * PANEL_HEIGHT);
    frame.clear(BinaryColor::Off).unwrap();
    assert_eq!(frame.ink_count(), 0);
}

#[test]
fn full_refresh_writes_both_rams_then_activates() {
    let (mut driver, wire) = panel(Some(3));
    let mut frame = FrameBuffer::new();
    frame.set_pixel(0, 0, true);
    driver.show(&frame, RefreshMode::Full).unwrap();

    let cmds = commands(&wire);
    assert_eq!(cmds[0], 0x12);
    assert!(matches!(wire.borrow().events[0], Bus::Reset(false)));
    assert_eq!(data_after(&wire, 0x22), [[0xF7].to_vec()]);
    assert_eq!(data_after(&wire, 0x3C), [[0x05].to_vec()]);
    assert_eq!(cmds.last(), Some(&0x20));

    let previous = data_after(&wire, 0x26);
    let current = data_after(&wire, 0x24);
    assert_eq!(previous.len(), 1);
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].as_slice(), frame.as_bytes());
    assert_eq!(previous[0], current[0]);
}

#[test]
fn partial_refresh_stores_previous_frame_after_update() {
    let (mut driver, wire) = panel(Some(0));
    let frame = FrameBuffer::new();
    driver.show(&frame, RefreshMode::Partial).unwrap();

    let cmds = commands(&wire);
    assert_eq!(data_after(&wire, 0x22), [[0xFC].to_vec()]);
    assert_eq!(data_after(&wire, 0x3C), [[0x80].to_vec()]);
    let activate = cmds.iter().position(|&c| c == 0x20).unwrap();
    let previous = cmds.iter().rposition(|&c| c == 0x26).unwrap();
    assert!(previous > activate);
    assert_eq!(cmds.last(), Some(&0x26));
}

#[test]
fn stuck_busy_line_times_out() {
    let (mut driver, _wire) = panel(None);
    let frame = FrameBuffer::new();
    assert_eq!(
        driver.show(&frame, RefreshMode::Full),
        Err(DisplayError::BusyTimeout)
    );
}

#[test]
fn sleep_keeps_ram() {
    let (mut driver, wire) = panel(Some(0));
    driver.sleep().unwrap();
    assert_eq!(commands(&wire), [0x10]);
    assert_eq!(data_after(&wire, 0x10), [[0x01].to_vec()]);
}

#[test]
fn full_refresh_every_n_updates() {
    let mut partials = 0u8;
    assert_eq!(next_refresh_mode(&mut partials, 4, true), RefreshMode::Full);
    let modes: Vec<RefreshMode> = (0..8)
        .map(|_| next_refresh_mode(&mut partials, 4, false))
        .collect();
    assert_eq!(
        modes,
        [
            RefreshMode::Partial,
            RefreshMode::Partial,
            RefreshMode::Partial,
            RefreshMode::Full,
            RefreshMode::Partial,
            RefreshMode::Partial,
            RefreshMode::Partial,
            RefreshMode::Full,
        ]
    );
}

#[test]
fn cold_boot_forces_full_refresh_and_resets_counter() {
    let mut partials = 2u8;
    assert_eq!(next_refresh_mode(&mut partials, 20, true), RefreshMode::Full);
    assert_eq!(partials, 0);
    let mut partials = 0u8;
    assert_eq!(next_refresh_mode(&mut partials, 1, false), RefreshMode::Full);
}
