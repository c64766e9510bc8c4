//! Timestamp conversion for chat database dates.
//!
//! `message.date` counts nanoseconds since 2001-01-01T00:00:00Z rather than the
//! unix epoch. It has to be shifted onto the unix epoch before any calendar
//! field is derived.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::{AnalysisError, Result};

/// Seconds between the unix epoch and 2001-01-01T00:00:00Z
pub const REFERENCE_EPOCH_UNIX_SECONDS: i64 = 978_307_200;

/// Nanoseconds per second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a stored date to an absolute UTC timestamp.
///
/// Sub-second precision is dropped; the division truncates toward zero.
pub fn reference_nanos_to_utc(raw: i64) -> Result<DateTime<Utc>> {
    let seconds = (raw / NANOS_PER_SECOND)
        .checked_add(REFERENCE_EPOCH_UNIX_SECONDS)
        .ok_or(AnalysisError::InvalidTimestamp(raw))?;
    DateTime::from_timestamp(seconds, 0).ok_or(AnalysisError::InvalidTimestamp(raw))
}

/// Convert a stored date to wall-clock time in `tz`.
pub fn reference_nanos_to_wall_clock<Tz: TimeZone>(raw: i64, tz: &Tz) -> Result<NaiveDateTime> {
    Ok(reference_nanos_to_utc(raw)?.with_timezone(tz).naive_local())
}

/// Inverse of [`reference_nanos_to_utc`], whole seconds only.
#[must_use]
pub fn utc_to_reference_nanos(timestamp: &DateTime<Utc>) -> i64 {
    (timestamp.timestamp() - REFERENCE_EPOCH_UNIX_SECONDS) * NANOS_PER_SECOND
}

/// Zone in which calendar fields are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallClock {
    /// The machine's local zone
    #[default]
    Local,
    /// Coordinated universal time
    Utc,
}

impl WallClock {
    /// Convert a stored date to wall-clock time in this zone
    pub fn convert(self, raw: i64) -> Result<NaiveDateTime> {
        match self {
            Self::Local => reference_nanos_to_wall_clock(raw, &Local),
            Self::Utc => reference_nanos_to_wall_clock(raw, &Utc),
        }
    }
}

impl FromStr for WallClock {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(AnalysisError::InvalidConfig(format!(
                "Invalid timezone: {other}. Must be one of: local, utc"
            ))),
        }
    }
}
