use serde::Deserialize;

use crate::calendar::{parse_iso_minute_prefix, CalendarTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadError {
    Json,
    Datetime,
}

impl PayloadError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Json => "body is not a worldtime json object",
            Self::Datetime => "datetime field is not YYYY-MM-DDTHH:MM",
        }
    }
}

#[derive(Deserialize)]
struct WorldTimeResponse<'a> {
    datetime: &'a str,
}

/// Local time from a worldtimeapi.org response body, truncated to the minute.
pub fn parse_world_time(body: &[u8]) -> Result<CalendarTime, PayloadError> {
    let (response, _) = serde_json_core::from_slice::<WorldTimeResponse<'_>>(body)
        .map_err(|_| PayloadError::Json)?;
    parse_iso_minute_prefix(response.datetime).ok_or(PayloadError::Datetime)
}
