//! Watchy boards ship with either a DS3231 or a PCF8563. Both keep BCD
//! registers and a two-digit year counted from 2000.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::{
    calendar::{CalendarError, CalendarTime, MIN_YEAR},
    clock::RealTimeClock,
};

pub const DS3231_ADDR: u8 = 0x68;
pub const PCF8563_ADDR: u8 = 0x51;

const DS3231_REG_SECONDS: u8 = 0x00;
const DS3231_REG_STATUS: u8 = 0x0F;
const DS3231_STATUS_OSF: u8 = 0x80;

const PCF8563_REG_SECONDS: u8 = 0x02;
const PCF8563_VL: u8 = 0x80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RtcError<E> {
    Bus(E),
    InvalidTime(CalendarError),
}

impl<E> RtcError<E> {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bus(_) => "i2c transfer failed",
            Self::InvalidTime(err) => err.label(),
        }
    }
}

pub(crate) const fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

pub(crate) const fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

fn two_digit_year<E>(time: &CalendarTime) -> Result<u8, RtcError<E>> {
    time.validate().map_err(RtcError::InvalidTime)?;
    Ok((time.year - MIN_YEAR) as u8)
}

pub struct Ds3231<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RealTimeClock for Ds3231<I2C> {
    type Error = RtcError<I2C::Error>;

    fn set(&mut self, time: &CalendarTime) -> Result<(), Self::Error> {
        let year = two_digit_year(time)?;
        let regs = [
            DS3231_REG_SECONDS,
            to_bcd(time.second),
            to_bcd(time.minute),
            to_bcd(time.hour),
            time.weekday() + 1,
            to_bcd(time.day),
            to_bcd(time.month),
            to_bcd(year),
        ];
        self.i2c.write(DS3231_ADDR, &regs).map_err(RtcError::Bus)?;
        // Oscillator-stopped flag only clears on an explicit write.
        self.i2c
            .write(DS3231_ADDR, &[DS3231_REG_STATUS, 0x00])
            .map_err(RtcError::Bus)
    }

    fn read(&mut self) -> Result<CalendarTime, Self::Error> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(DS3231_ADDR, &[DS3231_REG_SECONDS], &mut regs)
            .map_err(RtcError::Bus)?;
        let mut status = [0u8; 1];
        self.i2c
            .write_read(DS3231_ADDR, &[DS3231_REG_STATUS], &mut status)
            .map_err(RtcError::Bus)?;
        if status[0] & DS3231_STATUS_OSF != 0 {
            log::warn!("rtc: ds3231 oscillator stopped, time not trusted");
        }

        let hour = if regs[2] & 0x40 != 0 {
            // 12-hour mode, bit 5 is PM.
            let base = from_bcd(regs[2] & 0x1F) % 12;
            if regs[2] & 0x20 != 0 {
                base + 12
            } else {
                base
            }
        } else {
            from_bcd(regs[2] & 0x3F)
        };
        CalendarTime::new(
            MIN_YEAR + u16::from(from_bcd(regs[6])),
            from_bcd(regs[5] & 0x1F),
            from_bcd(regs[4] & 0x3F),
            hour,
            from_bcd(regs[1] & 0x7F),
            from_bcd(regs[0] & 0x7F),
        )
        .map_err(RtcError::InvalidTime)
    }
}

pub struct Pcf8563<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Pcf8563<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RealTimeClock for Pcf8563<I2C> {
    type Error = RtcError<I2C::Error>;

    fn set(&mut self, time: &CalendarTime) -> Result<(), Self::Error> {
        let year = two_digit_year(time)?;
        // Writing the seconds register also clears the VL flag.
        let regs = [
            PCF8563_REG_SECONDS,
            to_bcd(time.second),
            to_bcd(time.minute),
            to_bcd(time.hour),
            to_bcd(time.day),
            time.weekday(),
            to_bcd(time.month),
            to_bcd(year),
        ];
        self.i2c.write(PCF8563_ADDR, &regs).map_err(RtcError::Bus)
    }

    fn read(&mut self) -> Result<CalendarTime, Self::Error> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(PCF8563_ADDR, &[PCF8563_REG_SECONDS], &mut regs)
            .map_err(RtcError::Bus)?;
        if regs[0] & PCF8563_VL != 0 {
            log::warn!("rtc: pcf8563 voltage low flag set, time not trusted");
        }
        CalendarTime::new(
            MIN_YEAR + u16::from(from_bcd(regs[6])),
            from_bcd(regs[5] & 0x1F),
            from_bcd(regs[3] & 0x3F),
            from_bcd(regs[2] & 0x3F),
            from_bcd(regs[1] & 0x7F),
            from_bcd(regs[0] & 0x7F),
        )
        .map_err(RtcError::InvalidTime)
    }
}

/// Whichever RTC answered on the bus.
pub enum WatchyRtc<I2C> {
    Ds3231(Ds3231<I2C>),
    Pcf8563(Pcf8563<I2C>),
}

impl<I2C: I2c> WatchyRtc<I2C> {
    /// Probes the DS3231 first, then the PCF8563. Hands the bus back when
    /// neither acknowledges.
    pub fn detect(mut i2c: I2C) -> Result<Self, I2C> {
        if probe(&mut i2c, DS3231_ADDR, DS3231_REG_STATUS) {
            log::info!("rtc: ds3231 detected");
            return Ok(Self::Ds3231(Ds3231::new(i2c)));
        }
        if probe(&mut i2c, PCF8563_ADDR, PCF8563_REG_SECONDS) {
            log::info!("rtc: pcf8563 detected");
            return Ok(Self::Pcf8563(Pcf8563::new(i2c)));
        }
        log::warn!("rtc: no clock chip answered");
        Err(i2c)
    }

    pub const fn model(&self) -> &'static str {
        match self {
            Self::Ds3231(_) => "ds3231",
            Self::Pcf8563(_) => "pcf8563",
        }
    }
}

fn probe<I2C: I2c>(i2c: &mut I2C, addr: u8, reg: u8) -> bool {
    let mut byte = [0u8; 1];
    match i2c.write_read(addr, &[reg], &mut byte) {
        Ok(()) => true,
        Err(err) => {
            if !matches!(err.kind(), ErrorKind::NoAcknowledge(_)) {
                log::warn!("rtc: probe addr={:#04x} err={:?}", addr, err.kind());
            }
            false
        }
    }
}

impl<I2C: I2c> RealTimeClock for WatchyRtc<I2C> {
    type Error = RtcError<I2C::Error>;

    fn set(&mut self, time: &CalendarTime) -> Result<(), Self::Error> {
        match self {
            Self::Ds3231(rtc) => rtc.set(time),
            Self::Pcf8563(rtc) => rtc.set(time),
        }
    }

    fn read(&mut self) -> Result<CalendarTime, Self::Error> {
        match self {
            Self::Ds3231(rtc) => rtc.read(),
            Self::Pcf8563(rtc) => rtc.read(),
        }
    }
}
