use std::vec::Vec;

use embedded_hal::{
    delay::DelayNs,
    i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation},
};

use super::{bma423::FEATURE_PAGE_LEN, rtc::from_bcd, rtc::to_bcd, *};
use crate::{
    calendar::CalendarTime,
    clock::{RealTimeClock, TimeSource},
    sensors::StepCounter,
};

const FEATURES_IN: usize = 0x5E;

/// Register-file model of a few I2C devices. On the BMA423 the feature port
/// does not auto-increment: while INIT_CTRL is 0 it takes the config image at
/// the asic word address, afterwards it reads and writes the feature page.
struct FakeBus {
    devices: Vec<(u8, [u8; 0x80])>,
    writes: Vec<(u8, Vec<u8>)>,
    feature_image: Vec<u8>,
    feature_page: [u8; FEATURE_PAGE_LEN],
}

impl FakeBus {
    fn with(addrs: &[u8]) -> Self {
        Self {
            devices: addrs.iter().map(|&addr| (addr, [0u8; 0x80])).collect(),
            writes: Vec::new(),
            feature_image: Vec::new(),
            feature_page: [0u8; FEATURE_PAGE_LEN],
        }
    }

    fn write_feature_port(&mut self, idx: usize, data: &[u8]) {
        let regs = &self.devices[idx].1;
        if regs[0x59] == 0 {
            let word = (usize::from(regs[0x5C]) << 4) | usize::from(regs[0x5B]);
            let start = word * 2;
            if self.feature_image.len() < start + data.len() {
                self.feature_image.resize(start + data.len(), 0);
            }
            self.feature_image[start..start + data.len()].copy_from_slice(data);
        } else {
            self.feature_page[..data.len()].copy_from_slice(data);
        }
    }

    fn regs(&mut self, addr: u8) -> &mut [u8; 0x80] {
        &mut self
            .devices
            .iter_mut()
            .find(|(a, _)| *a == addr)
            .unwrap()
            .1
    }
}

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        let Some(idx) = self.devices.iter().position(|(a, _)| *a == address) else {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        };
        let mut pointer = 0usize;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    self.writes.push((address, bytes.to_vec()));
                    let (first, rest) = bytes.split_first().ok_or(ErrorKind::Other)?;
                    pointer = usize::from(*first);
                    if address == BMA423_ADDR && pointer == FEATURES_IN {
                        self.write_feature_port(idx, rest);
                        continue;
                    }
                    for &b in rest {
                        self.devices[idx].1[pointer] = b;
                        pointer += 1;
                    }
                }
                Operation::Read(buf) if address == BMA423_ADDR && pointer == FEATURES_IN => {
                    buf.copy_from_slice(&self.feature_page[..buf.len()]);
                }
                Operation::Read(buf) => {
                    for slot in buf.iter_mut() {
                        *slot = self.devices[idx].1[pointer];
                        pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn sample_time() -> CalendarTime {
    CalendarTime::new(2024, 3, 15, 13, 45, 7).unwrap()
}

#[test]
fn bcd_conversions() {
    assert_eq!(to_bcd(59), 0x59);
    assert_eq!(to_bcd(7), 0x07);
    assert_eq!(from_bcd(0x24), 24);
    assert_eq!(from_bcd(to_bcd(99)), 99);
}

#[test]
fn ds3231_set_writes_bcd_registers_and_clears_osf() {
    let mut rtc = Ds3231::new(FakeBus::with(&[DS3231_ADDR]));
    rtc.set(&sample_time()).unwrap();
    let bus = rtc.release();
    assert_eq!(
        bus.writes[0],
        (DS3231_ADDR, [0x00, 0x07, 0x45, 0x13, 6, 0x15, 0x03, 0x24].to_vec())
    );
    assert_eq!(bus.writes[1], (DS3231_ADDR, [0x0F, 0x00].to_vec()));
}

#[test]
fn ds3231_reads_back_what_was_set() {
    let mut rtc = Ds3231::new(FakeBus::with(&[DS3231_ADDR]));
    rtc.set(&sample_time()).unwrap();
    assert_eq!(rtc.read().unwrap(), sample_time());
}

#[test]
fn ds3231_converts_12_hour_mode() {
    let mut bus = FakeBus::with(&[DS3231_ADDR]);
    let regs = bus.regs(DS3231_ADDR);
    regs[0..7].copy_from_slice(&[0x00, 0x30, 0x40 | 0x20 | 0x11, 5, 0x01, 0x02, 0x25]);
    let mut rtc = Ds3231::new(bus);
    let time = rtc.read().unwrap();
    assert_eq!((time.year, time.month, time.day), (2025, 2, 1));
    assert_eq!((time.hour, time.minute), (23, 30));
}

#[test]
fn ds3231_rejects_garbage_registers() {
    let mut bus = FakeBus::with(&[DS3231_ADDR]);
    bus.regs(DS3231_ADDR)[0..7].copy_from_slice(&[0, 0, 0, 1, 0x31, 0x02, 0x24]);
    let mut rtc = Ds3231::new(bus);
    assert!(matches!(rtc.read(), Err(RtcError::InvalidTime(_))));
}

#[test]
fn pcf8563_round_trips_and_masks_vl_flag() {
    let mut rtc = Pcf8563::new(FakeBus::with(&[PCF8563_ADDR]));
    rtc.set(&sample_time()).unwrap();
    let mut bus = rtc.release();
    assert_eq!(
        bus.writes[0],
        (PCF8563_ADDR, [0x02, 0x07, 0x45, 0x13, 0x15, 5, 0x03, 0x24].to_vec())
    );
    bus.regs(PCF8563_ADDR)[0x02] |= 0x80;
    let mut rtc = Pcf8563::new(bus);
    assert_eq!(rtc.read().unwrap(), sample_time());
}

#[test]
fn detect_prefers_ds3231_then_pcf8563() {
    let rtc = WatchyRtc::detect(FakeBus::with(&[DS3231_ADDR, PCF8563_ADDR])).ok().unwrap();
    assert_eq!(rtc.model(), "ds3231");
    let rtc = WatchyRtc::detect(FakeBus::with(&[PCF8563_ADDR])).ok().unwrap();
    assert_eq!(rtc.model(), "pcf8563");
}

#[test]
fn detect_returns_bus_when_nothing_answers() {
    let bus = WatchyRtc::detect(FakeBus::with(&[BMA423_ADDR])).err().unwrap();
    assert_eq!(bus.devices.len(), 1);
}

#[test]
fn missing_rtc_surfaces_bus_error() {
    let mut rtc = Ds3231::new(FakeBus::with(&[]));
    assert!(matches!(
        rtc.read(),
        Err(RtcError::Bus(ErrorKind::NoAcknowledge(_)))
    ));
    assert!(matches!(
        rtc.set(&CalendarTime {
            year: 1999,
            ..sample_time()
        }),
        Err(RtcError::InvalidTime(_))
    ));
}

#[test]
fn rtc_read_failure_reads_as_no_time() {
    let mut rtc = Ds3231::new(FakeBus::with(&[]));
    assert_eq!(rtc.now(), None);

    let mut rtc = Pcf8563::new(FakeBus::with(&[PCF8563_ADDR]));
    rtc.set(&sample_time()).unwrap();
    assert_eq!(rtc.now(), Some(sample_time()));
}

fn bma423_bus(status: u8) -> FakeBus {
    let mut bus = FakeBus::with(&[BMA423_ADDR]);
    bus.regs(BMA423_ADDR)[0x00] = 0x13;
    bus.regs(BMA423_ADDR)[0x2A] = status;
    bus
}

fn sample_image() -> Vec<u8> {
    (0..40u8).map(|b| b.wrapping_mul(7).wrapping_add(3)).collect()
}

#[test]
fn bma423_init_uploads_image_and_enables_step_counter() {
    let mut bus = bma423_bus(0x01);
    bus.feature_page[0x3A] = 0x2D;
    bus.feature_page[0x3B] = 0x01;
    bus.feature_page[0x10] = 0xAA;
    let mut imu = Bma423::new(bus);
    imu.init(&sample_image(), &mut NoDelay).unwrap();
    let bus = imu.release();

    assert_eq!(bus.feature_image, sample_image());
    assert_eq!(bus.feature_page[0x3B], 0x11);
    assert_eq!(bus.feature_page[0x3A], 0x2D);
    assert_eq!(bus.feature_page[0x10], 0xAA);

    let writes: Vec<Vec<u8>> = bus.writes.into_iter().map(|(_, bytes)| bytes).collect();
    let at = |wanted: &[u8]| writes.iter().position(|w| w.as_slice() == wanted).unwrap();
    assert!(at(&[0x7C, 0x00]) < at(&[0x59, 0x00]));
    assert!(at(&[0x59, 0x00]) < at(&[0x59, 0x01]));
    // Third chunk starts at byte 32, asic word 16.
    assert!(writes.contains(&[0x5B, 0x00].to_vec()));
    assert!(writes.contains(&[0x5C, 0x01].to_vec()));
    assert!(at(&[0x59, 0x01]) < at(&[0x7D, 0x04]));
    assert_eq!(writes.last().unwrap().len(), FEATURE_PAGE_LEN + 1);
}

#[test]
fn bma423_reads_little_endian_count() {
    let mut bus = bma423_bus(0x01);
    bus.regs(BMA423_ADDR)[0x1E..0x22].copy_from_slice(&[0x39, 0x30, 0x00, 0x00]);
    let mut imu = Bma423::new(bus);
    imu.init(&sample_image(), &mut NoDelay).unwrap();
    assert_eq!(imu.raw_steps().unwrap(), 12_345);
}

#[test]
fn bma423_reports_feature_engine_that_never_starts() {
    let mut imu = Bma423::new(bma423_bus(0x02));
    assert_eq!(
        imu.init(&sample_image(), &mut NoDelay),
        Err(Bma423Error::FeatureEngine(0x02))
    );
    let bus = imu.release();
    assert!(!bus.writes.iter().any(|(_, w)| w.as_slice() == [0x7D, 0x04]));
}

#[test]
fn bma423_without_image_touches_nothing() {
    let mut imu = Bma423::new(bma423_bus(0x01));
    assert_eq!(imu.init(&[], &mut NoDelay), Err(Bma423Error::NoFeatureConfig));
    // Only the chip-id register pointer went out.
    assert!(imu.release().writes.iter().all(|(_, w)| w.len() == 1));
}

#[test]
fn bma423_wrong_chip_is_rejected() {
    let mut bus = FakeBus::with(&[BMA423_ADDR]);
    bus.regs(BMA423_ADDR)[0x00] = 0x11;
    let mut imu = Bma423::new(bus);
    assert_eq!(
        imu.init(&sample_image(), &mut NoDelay),
        Err(Bma423Error::ChipId(0x11))
    );
}
