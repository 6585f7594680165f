pub mod bma423;
pub mod rtc;
#[cfg(test)]
mod tests;

pub use bma423::{Bma423, Bma423Error, BMA423_ADDR};
pub use rtc::{Ds3231, Pcf8563, RtcError, WatchyRtc, DS3231_ADDR, PCF8563_ADDR};
