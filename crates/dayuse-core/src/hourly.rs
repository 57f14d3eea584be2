//! Hour-of-day distribution of clipped intervals.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;

use crate::clip::{ClippedInterval, whole_minutes};

/// Number of hour-of-day buckets in a day.
pub const HOURS_PER_DAY: usize = 24;

/// Minutes used during one hour of the target day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    /// Hour of day in UTC, `0..=23`.
    pub hour: u32,
    pub minutes: u32,
}

/// Per-hour minute accumulators for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourlyMinutes([u32; HOURS_PER_DAY]);

impl HourlyMinutes {
    #[must_use]
    pub const fn new() -> Self {
        Self([0; HOURS_PER_DAY])
    }

    /// Spreads a clipped interval over the hours it covers.
    ///
    /// Walks the interval in hour-aligned segments. Each segment is credited
    /// with the whole minutes it adds to the running total since
    /// `interval.start`, so the credited minutes always sum to
    /// `interval.minutes` even when the interval is not minute-aligned.
    ///
    /// The interval must lie within one day; at most 24 segments are walked.
    pub fn add(&mut self, interval: &ClippedInterval) {
        let mut cursor = interval.start;
        let mut credited = 0;

        for _ in 0..HOURS_PER_DAY {
            if cursor >= interval.end {
                break;
            }
            let segment_end = next_hour_mark(cursor).min(interval.end);
            let elapsed = whole_minutes(interval.start, segment_end);
            self.0[cursor.hour() as usize] += elapsed - credited;
            credited = elapsed;
            cursor = segment_end;
        }

        debug_assert!(cursor >= interval.end, "interval spans more than one day");
    }

    /// Adds minutes directly to one hour. Out-of-range hours are ignored.
    pub fn add_minutes(&mut self, hour: u32, minutes: u32) {
        if let Some(slot) = self.0.get_mut(hour as usize) {
            *slot += minutes;
        }
    }

    /// Minutes recorded for `hour`, or zero when out of range.
    pub fn get(&self, hour: usize) -> u32 {
        self.0.get(hour).copied().unwrap_or(0)
    }

    /// Sum across all 24 hours.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// All 24 buckets in hour order, including empty hours.
    pub fn buckets(&self) -> Vec<HourBucket> {
        (0u32..)
            .zip(self.0)
            .map(|(hour, minutes)| HourBucket { hour, minutes })
            .collect()
    }
}

/// The first exact hour mark strictly after `cursor`.
fn next_hour_mark(cursor: DateTime<Utc>) -> DateTime<Utc> {
    let into_hour = Duration::minutes(i64::from(cursor.minute()))
        + Duration::seconds(i64::from(cursor.second()))
        + Duration::nanoseconds(i64::from(cursor.nanosecond()));
    cursor - into_hour + Duration::hours(1)
}
