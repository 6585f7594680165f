use core::fmt::Debug;

use crate::calendar::CalendarTime;

/// Battery-backed calendar clock.
pub trait RealTimeClock {
    type Error: Debug;

    fn set(&mut self, time: &CalendarTime) -> Result<(), Self::Error>;
    fn read(&mut self) -> Result<CalendarTime, Self::Error>;
}

/// What the watch faces consume: the current time, if the clock answers.
pub trait TimeSource {
    fn now(&mut self) -> Option<CalendarTime>;
}

impl<T> TimeSource for T
where
    T: RealTimeClock,
{
    fn now(&mut self) -> Option<CalendarTime> {
        match self.read() {
            Ok(time) => Some(time),
            Err(err) => {
                log::warn!("clock: read err={:?}", err);
                None
            }
        }
    }
}
