use core::fmt::Write;

pub const WTA_DEFAULT_URL: &str = "http://worldtimeapi.org/api/timezone/";
pub const WTA_DEFAULT_TIMEZONE: &str = "Etc/UTC";
pub const WTA_LONG_INTERVAL_TICKS: u32 = 60;
pub const WTA_SHORT_INTERVAL_TICKS: u32 = 0;
pub const WTA_CONNECT_TIMEOUT_MS: u32 = 10_000;
pub const WTA_INITIAL_COUNTDOWN: u32 = 0;
pub const WTA_URL_MAX: usize = 160;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSyncConfig {
    pub base_url: &'static str,
    pub timezone: &'static str,
    /// Countdown after a failed attempt; 0 retries on the next wake cycle.
    pub short_interval: u32,
    /// Countdown after a successful sync.
    pub long_interval: u32,
    pub connect_timeout_ms: u32,
    /// Countdown on cold boot; 0 syncs on the first wake cycle.
    pub initial_countdown: u32,
}

impl Default for TimeSyncConfig {
    fn default() -> Self {
        Self {
            base_url: WTA_DEFAULT_URL,
            timezone: WTA_DEFAULT_TIMEZONE,
            short_interval: WTA_SHORT_INTERVAL_TICKS,
            long_interval: WTA_LONG_INTERVAL_TICKS,
            connect_timeout_ms: WTA_CONNECT_TIMEOUT_MS,
            initial_countdown: WTA_INITIAL_COUNTDOWN,
        }
    }
}

impl TimeSyncConfig {
    /// Defaults with build-time overrides for the endpoint.
    pub fn from_env() -> Self {
        Self {
            base_url: option_env!("WATCHY_WTA_URL").unwrap_or(WTA_DEFAULT_URL),
            timezone: option_env!("WATCHY_WTA_TIMEZONE").unwrap_or(WTA_DEFAULT_TIMEZONE),
            ..Self::default()
        }
    }

    pub fn request_url(&self) -> Option<heapless::String<WTA_URL_MAX>> {
        let mut url = heapless::String::new();
        write!(&mut url, "{}{}", self.base_url, self.timezone).ok()?;
        Some(url)
    }
}
