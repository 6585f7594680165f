use log::LevelFilter;

pub(crate) const LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub(crate) const I2C_FREQ_KHZ: u32 = 100;
pub(crate) const I2C_TIMEOUT_MS: u64 = 40;
pub(crate) const DISPLAY_SPI_MHZ: u32 = 20;

/// Partial refreshes between two full ones, counted across deep sleeps.
pub(crate) const FULL_REFRESH_EVERY_N_UPDATES: u8 = 20;

/// Raw 12-bit reading of 4096 at 11 dB through the x2 divider.
pub(crate) const BATTERY_ADC_FULL_SCALE_MV: u32 = 7_230;
pub(crate) const BATTERY_ADC_SAMPLES: u32 = 8;

/// Used when the clock cannot be read and there is no minute boundary to aim at.
pub(crate) const FALLBACK_SLEEP_SECONDS: u64 = 60;

#[cfg(feature = "time-sync")]
pub(crate) const WIFI_CONNECT_TIMEOUT_MS: u64 = 10_000;
#[cfg(feature = "time-sync")]
pub(crate) const DHCP_TIMEOUT_MS: u64 = 8_000;
#[cfg(feature = "time-sync")]
pub(crate) const HTTP_READ_TIMEOUT_MS: u64 = 10_000;

/// Empty unless `WATCHY_BMA423_CONFIG` was set at build time.
pub(crate) static BMA423_FEATURE_CONFIG: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/bma423_config.bin"));
