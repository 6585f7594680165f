//! World-time sync: once per wake cycle, either count down or fetch the
//! current time from worldtimeapi.org and write it into the RTC.

mod config;
mod countdown;
mod payload;

pub use config::{
    TimeSyncConfig, WTA_CONNECT_TIMEOUT_MS, WTA_DEFAULT_TIMEZONE, WTA_DEFAULT_URL,
    WTA_LONG_INTERVAL_TICKS, WTA_SHORT_INTERVAL_TICKS, WTA_URL_MAX,
};
pub use countdown::SyncCountdown;
pub use payload::{parse_world_time, PayloadError};

use crate::{
    calendar::CalendarTime,
    clock::RealTimeClock,
    http::{HttpClient, HttpError, HttpUrl, UrlError},
};

/// Raw response buffer: status line, headers and the JSON body.
pub const SYNC_RESPONSE_MAX: usize = 2048;

/// Network link for the duration of one sync attempt.
#[allow(async_fn_in_trait)]
pub trait Connectivity {
    /// Brings the radio up and waits for a usable link.
    async fn connect(&mut self) -> bool;
    /// Drops the link and powers the radio down.
    async fn disconnect(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncError {
    ConnectivityUnavailable,
    RequestFailed(HttpError),
    RequestTimeout,
    NonSuccessStatus(u16),
    MalformedPayload(PayloadError),
    Clock,
}

impl SyncError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ConnectivityUnavailable => "no network",
            Self::RequestFailed(err) => err.label(),
            Self::RequestTimeout => "request timeout",
            Self::NonSuccessStatus(_) => "non-200 status",
            Self::MalformedPayload(err) => err.label(),
            Self::Clock => "rtc write/read failed",
        }
    }
}

impl From<HttpError> for SyncError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout => Self::RequestTimeout,
            other => Self::RequestFailed(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Counted down; no network activity.
    Idle { remaining: u32 },
    /// Clock updated; carries the value read back from the RTC.
    Synced(CalendarTime),
    /// Attempt failed; the countdown was set to the short interval.
    Failed(SyncError),
}

pub struct TimeSyncScheduler {
    config: TimeSyncConfig,
    countdown: SyncCountdown,
}

impl TimeSyncScheduler {
    pub const fn new(config: TimeSyncConfig, countdown: SyncCountdown) -> Self {
        Self { config, countdown }
    }

    pub const fn cold_boot(config: TimeSyncConfig) -> Self {
        Self::new(config, SyncCountdown::new(config.initial_countdown))
    }

    pub const fn countdown(&self) -> SyncCountdown {
        self.countdown
    }

    pub const fn config(&self) -> &TimeSyncConfig {
        &self.config
    }

    /// One wake cycle. Failures never escape: the caller renders whatever
    /// the clock holds afterwards.
    pub async fn tick<N, H, C>(&mut self, net: &mut N, http: &mut H, clock: &mut C) -> TickOutcome
    where
        N: Connectivity,
        H: HttpClient,
        C: RealTimeClock,
    {
        if !self.countdown.is_due() {
            self.countdown.decrement();
            return TickOutcome::Idle {
                remaining: self.countdown.remaining(),
            };
        }

        let result = self.sync_once(net, http, clock).await;
        net.disconnect().await;

        match result {
            Ok(time) => {
                self.countdown.reset(self.config.long_interval);
                log::info!(
                    "time_sync: clock set to {} next_sync_in={}",
                    time,
                    self.config.long_interval
                );
                TickOutcome::Synced(time)
            }
            Err(err) => {
                self.countdown.reset(self.config.short_interval);
                log::warn!(
                    "time_sync: attempt failed err={:?} ({}) retry_in={}",
                    err,
                    err.label(),
                    self.config.short_interval
                );
                TickOutcome::Failed(err)
            }
        }
    }

    async fn sync_once<N, H, C>(
        &self,
        net: &mut N,
        http: &mut H,
        clock: &mut C,
    ) -> Result<CalendarTime, SyncError>
    where
        N: Connectivity,
        H: HttpClient,
        C: RealTimeClock,
    {
        let url_text = self
            .config
            .request_url()
            .ok_or(SyncError::RequestFailed(HttpError::Url(UrlError::TooLong)))?;
        let url = HttpUrl::parse(&url_text).map_err(HttpError::from)?;

        if !net.connect().await {
            return Err(SyncError::ConnectivityUnavailable);
        }

        let mut raw = [0u8; SYNC_RESPONSE_MAX];
        let response = http
            .get(&url, self.config.connect_timeout_ms, &mut raw)
            .await?;
        if !response.is_ok() {
            return Err(SyncError::NonSuccessStatus(response.status));
        }

        let body = &raw[..response.body_len.min(raw.len())];
        let time = parse_world_time(body).map_err(SyncError::MalformedPayload)?;

        clock.set(&time).map_err(|err| {
            log::warn!("time_sync: rtc set err={:?}", err);
            SyncError::Clock
        })?;
        clock.read().map_err(|err| {
            log::warn!("time_sync: rtc read-back err={:?}", err);
            SyncError::Clock
        })
    }
}
