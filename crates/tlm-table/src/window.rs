//! Time-range and row-count windowing
//!
//! Window bounds are compared with timestamps as strings, like the index
//! ordering. Bounds produced by [`WindowParams::default_for`] use
//! millisecond precision (`2024-01-01T00:00:00.000Z`).

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TableError;
use crate::index::TimestampIndex;

/// Default number of rows shown
pub const DEFAULT_MAX_ROWS: usize = 20;

/// Default distance of the window start before the oldest packet, in days
pub const DEFAULT_LOOKBACK_DAYS: i64 = 1;

/// Largest lookback accepted from user settings, in days
pub const MAX_LOOKBACK_DAYS: i64 = 36_525;

/// Window parameters controlled by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WindowParamsRepr")]
pub struct WindowParams {
    from_date: String,
    to_date: String,
    max_rows: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowParamsRepr {
    from_date: String,
    to_date: String,
    #[serde(default = "default_max_rows")]
    max_rows: usize,
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

impl TryFrom<WindowParamsRepr> for WindowParams {
    type Error = TableError;

    fn try_from(repr: WindowParamsRepr) -> Result<Self, Self::Error> {
        WindowParams::new(repr.from_date, repr.to_date, repr.max_rows)
    }
}

/// Format a time the way window bounds are written
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl WindowParams {
    /// Create window parameters; `max_rows` must be at least one
    pub fn new(
        from_date: impl Into<String>,
        to_date: impl Into<String>,
        max_rows: usize,
    ) -> Result<Self, TableError> {
        if max_rows == 0 {
            return Err(TableError::InvalidMaxRows(max_rows));
        }
        Ok(Self {
            from_date: from_date.into(),
            to_date: to_date.into(),
            max_rows,
        })
    }

    /// Default window: from one day before the oldest packet until `now`
    pub fn default_for(now: DateTime<Utc>, oldest: Option<&str>) -> Self {
        Self::with_lookback(now, oldest, default_lookback(), DEFAULT_MAX_ROWS)
    }

    /// Window from `lookback` before the oldest packet until `now`
    ///
    /// Without packets, or when the oldest timestamp cannot be parsed, the
    /// window starts `lookback` before `now`. A lookback reaching outside the
    /// representable time range is replaced by the default one.
    pub fn with_lookback(
        now: DateTime<Utc>,
        oldest: Option<&str>,
        lookback: Duration,
        max_rows: usize,
    ) -> Self {
        let lookback = bounded_lookback(now, lookback);
        let from_date = match oldest.map(|t| window_start(t, lookback)) {
            Some(Ok(from)) => from,
            Some(Err(e)) => {
                warn!("Cannot anchor window start: {}", e);
                format_timestamp(now - lookback)
            }
            None => format_timestamp(now - lookback),
        };

        Self {
            from_date,
            to_date: format_timestamp(now),
            max_rows: max_rows.max(1),
        }
    }

    /// Same window with a different start
    pub fn with_from_date(mut self, from_date: impl Into<String>) -> Self {
        self.from_date = from_date.into();
        self
    }

    /// Window start (inclusive)
    pub fn from_date(&self) -> &str {
        &self.from_date
    }

    /// Window end (inclusive)
    pub fn to_date(&self) -> &str {
        &self.to_date
    }

    /// Row cap
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Whether `timestamp` lies inside the time range
    pub fn contains(&self, timestamp: &str) -> bool {
        self.from_date.as_str() <= timestamp && timestamp <= self.to_date.as_str()
    }
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, TableError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TableError::InvalidTimestamp(format!("{}: {}", timestamp, e)))
}

/// Start of a window reaching `lookback` before `oldest`
pub fn window_start(oldest: &str, lookback: Duration) -> Result<String, TableError> {
    parse_timestamp(oldest)?
        .checked_sub_signed(lookback)
        .map(format_timestamp)
        .ok_or_else(|| {
            TableError::InvalidTimestamp(format!(
                "{} minus {} days is out of range",
                oldest,
                lookback.num_days()
            ))
        })
}

/// Lookback of `days` days, or `None` if it cannot be represented
pub fn lookback_days(days: i64) -> Option<Duration> {
    Duration::try_days(days)
}

/// `lookback`, or the default lookback when `now - lookback` falls outside
/// the representable time range
pub fn bounded_lookback(now: DateTime<Utc>, lookback: Duration) -> Duration {
    if now.checked_sub_signed(lookback).is_some() {
        return lookback;
    }
    warn!("Lookback of {} days out of range, using default", lookback.num_days());
    default_lookback()
}

fn default_lookback() -> Duration {
    Duration::days(DEFAULT_LOOKBACK_DAYS)
}

/// Select the most recent `max_rows` timestamps inside the range
///
/// The result keeps the index's descending order. An inverted range selects
/// nothing.
pub fn select(index: &TimestampIndex, params: &WindowParams) -> Vec<String> {
    index
        .iter()
        .filter(|t| params.contains(t))
        .take(params.max_rows)
        .map(str::to_string)
        .collect()
}
