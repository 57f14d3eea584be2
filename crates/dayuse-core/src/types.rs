//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UsageError;

/// Format used for target dates on input and in `DailyUsage::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar day in UTC.
///
/// Covers the half-open interval `[start, end)` where `end` is exactly
/// 24 hours after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetDay(NaiveDate);

impl TargetDay {
    /// Creates a target day from a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a strict `yyyy-MM-dd` string.
    ///
    /// Unpadded fields (`2026-2-3`) and trailing text are rejected.
    pub fn parse(value: &str) -> Result<Self, UsageError> {
        let invalid = || UsageError::InvalidTargetDate {
            value: value.to_string(),
        };
        let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())?;
        // chrono accepts unpadded numbers, so require an exact round-trip
        if date.format(DATE_FORMAT).to_string() != value {
            return Err(invalid());
        }
        Ok(Self(date))
    }

    /// The calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Midnight UTC at the start of the day.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.0.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Midnight UTC at the start of the following day (exclusive bound).
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.0
            .checked_add_days(Days::new(1))
            .map_or(DateTime::<Utc>::MAX_UTC, |next| {
                next.and_time(chrono::NaiveTime::MIN).and_utc()
            })
    }
}

impl fmt::Display for TargetDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl std::str::FromStr for TargetDay {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TargetDay {
    type Error = UsageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TargetDay> for String {
    fn from(day: TargetDay) -> Self {
        day.to_string()
    }
}

impl From<NaiveDate> for TargetDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
