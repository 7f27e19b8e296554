//! Observation time handling for full-disk imagery.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// How far behind the clock the requested snapshot lies.
///
/// Imagery for "now" is not published yet, one day back reliably is.
pub const OBSERVATION_LAG_HOURS: i64 = 24;

/// Snapshots are published on 10-minute boundaries.
pub const OBSERVATION_INTERVAL_MINUTES: u32 = 10;

/// The UTC timestamp for which satellite imagery is requested.
///
/// Always aligned to a 10-minute boundary with zero seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationTime {
    instant: DateTime<Utc>,
}

impl ObservationTime {
    /// Resolve the observation time for the given clock reading.
    ///
    /// Subtracts one day and truncates down to the previous 10-minute
    /// boundary, dropping seconds and sub-second precision.
    pub fn resolve(now: DateTime<Utc>) -> Self {
        let yesterday = now - Duration::hours(OBSERVATION_LAG_HOURS);
        let aligned = yesterday
            - Duration::minutes((yesterday.minute() % OBSERVATION_INTERVAL_MINUTES) as i64)
            - Duration::seconds(yesterday.second() as i64)
            - Duration::nanoseconds(yesterday.nanosecond() as i64);
        Self { instant: aligned }
    }

    pub fn year(&self) -> i32 {
        self.instant.year()
    }

    pub fn month(&self) -> u32 {
        self.instant.month()
    }

    pub fn day(&self) -> u32 {
        self.instant.day()
    }

    pub fn hour(&self) -> u32 {
        self.instant.hour()
    }

    pub fn minute(&self) -> u32 {
        self.instant.minute()
    }

    pub fn second(&self) -> u32 {
        self.instant.second()
    }

    /// The aligned instant in UTC.
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Date path component used by the tile server: `YYYY/MM/DD`.
    pub fn date_path(&self) -> String {
        format!("{:04}/{:02}/{:02}", self.year(), self.month(), self.day())
    }

    /// Compact time-of-day stamp used in tile file names: `HHMMSS`.
    pub fn time_stamp(&self) -> String {
        format!("{:02}{:02}{:02}", self.hour(), self.minute(), self.second())
    }

    /// Format as `YYYY-MM-DD HH:MM:SS` in the given timezone.
    pub fn format_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.instant
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

impl std::fmt::Display for ObservationTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.instant.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}
