//! Time handling for claims
//!
//! Departure times arrive as local wall-clock values (`NaiveDateTime`) while
//! claim bookkeeping is recorded in UTC. This module provides:
//! - [`Timezone`]: the jurisdiction timezone used to interpret "today"
//! - [`DateTimeRange`]: an inclusive UTC range for claim-date queries

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Local time {0} does not exist in timezone {1}")]
    NonexistentLocalTime(String, String),
}

/// Timezone wrapper for the claims jurisdiction
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_name(&s).map_err(serde::de::Error::custom)
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name such as `Asia/Shanghai`
    pub fn from_name(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(name.to_string()))
    }

    /// Returns the IANA name
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Returns the calendar date in this timezone for a UTC instant
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>, TemporalError> {
        let local = date.and_time(chrono::NaiveTime::MIN);
        local
            .and_local_timezone(self.0)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| TemporalError::NonexistentLocalTime(local.to_string(), self.name().to_string()))
    }

    /// Gets the end of day (23:59:59.999999999) in this timezone as UTC
    pub fn end_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>, TemporalError> {
        let local = date
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| TemporalError::NonexistentLocalTime(date.to_string(), self.name().to_string()))?;
        local
            .and_local_timezone(self.0)
            .latest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| TemporalError::NonexistentLocalTime(local.to_string(), self.name().to_string()))
    }

    /// Returns the UTC range covering one local calendar day
    pub fn day_range(&self, date: NaiveDate) -> Result<DateTimeRange, TemporalError> {
        DateTimeRange::new(self.start_of_day(date)?, self.end_of_day(date)?)
    }

    /// Returns the UTC range covering the current local calendar day
    pub fn today(&self) -> Result<DateTimeRange, TemporalError> {
        self.day_range(self.local_date(Utc::now()))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Asia::Shanghai)
    }
}

/// An inclusive range of UTC instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateTimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns true if the range contains the instant (both ends inclusive)
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_range_in_shanghai() {
        let tz = Timezone::default();
        let date = NaiveDate::from_ymd_opt(2025, 6, 26).unwrap();
        let range = tz.day_range(date).unwrap();

        // Shanghai is UTC+8 with no daylight saving
        assert_eq!(range.start, Utc.with_ymd_and_hms(2025, 6, 25, 16, 0, 0).unwrap());
        assert!(range.contains(Utc.with_ymd_and_hms(2025, 6, 26, 15, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2025, 6, 26, 16, 0, 0).unwrap()));
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let tz = Timezone::default();
        let utc = Utc.with_ymd_and_hms(2025, 6, 26, 17, 0, 0).unwrap();
        assert_eq!(tz.local_date(utc), NaiveDate::from_ymd_opt(2025, 6, 27).unwrap());
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let start = Utc.with_ymd_and_hms(2025, 6, 27, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 26, 0, 0, 0).unwrap();
        assert!(matches!(
            DateTimeRange::new(start, end),
            Err(TemporalError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_timezone_serde_roundtrip_by_name() {
        let tz = Timezone::from_name("Europe/London").unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Europe/London\"");
        assert!(Timezone::from_name("Mars/Olympus").is_err());
    }
}
