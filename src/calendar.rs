//! Calendar timestamp shared by the RTC drivers, the sync scheduler and the
//! watch faces.

use core::fmt;

/// Years the RTC chips can hold: two BCD digits on top of 2000.
pub const MIN_YEAR: u16 = 2000;
pub const MAX_YEAR: u16 = 2099;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarError {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl CalendarError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Year => "year out of range",
            Self::Month => "month out of range",
            Self::Day => "day out of range",
            Self::Hour => "hour out of range",
            Self::Minute => "minute out of range",
            Self::Second => "second out of range",
        }
    }
}

impl CalendarTime {
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, CalendarError> {
        let time = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        };
        time.validate()?;
        Ok(time)
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(CalendarError::Year);
        }
        if !(1..=12).contains(&self.month) {
            return Err(CalendarError::Month);
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return Err(CalendarError::Day);
        }
        if self.hour > 23 {
            return Err(CalendarError::Hour);
        }
        if self.minute > 59 {
            return Err(CalendarError::Minute);
        }
        if self.second > 59 {
            return Err(CalendarError::Second);
        }
        Ok(())
    }

    /// 0 = Sunday.
    pub fn weekday(&self) -> u8 {
        weekday(self.year, self.month, self.day)
    }

    pub fn minute_of_day(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Seconds left until the next minute boundary, never zero.
    pub fn seconds_to_next_minute(&self) -> u8 {
        60 - self.second.min(59)
    }

    pub fn with_second(self, second: u8) -> Self {
        Self { second, ..self }
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

// Sakamoto's method.
pub fn weekday(year: u16, month: u8, day: u8) -> u8 {
    const OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let year = if month < 3 { year.saturating_sub(1) } else { year };
    let month_idx = (month.clamp(1, 12) - 1) as usize;
    let sum = year + year / 4 - year / 100 + year / 400 + OFFSETS[month_idx] + day as u16;
    (sum % 7) as u8
}

/// Parses the `YYYY-MM-DDTHH:MM` prefix of an ISO-8601 timestamp. Anything
/// after the minutes is ignored; seconds come back as zero.
pub fn parse_iso_minute_prefix(text: &str) -> Option<CalendarTime> {
    let bytes = text.as_bytes();
    if bytes.len() < 16 {
        return None;
    }
    if bytes[4] != b'-' || bytes[7] != b'-' || bytes[10] != b'T' || bytes[13] != b':' {
        return None;
    }

    let year = parse_digits(&bytes[0..4])? as u16;
    let month = parse_digits(&bytes[5..7])? as u8;
    let day = parse_digits(&bytes[8..10])? as u8;
    let hour = parse_digits(&bytes[11..13])? as u8;
    let minute = parse_digits(&bytes[14..16])? as u8;

    CalendarTime::new(year, month, day, hour, minute, 0).ok()
}

fn parse_digits(bytes: &[u8]) -> Option<u32> {
    let mut value = 0u32;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (b - b'0') as u32;
    }
    Some(value)
}
