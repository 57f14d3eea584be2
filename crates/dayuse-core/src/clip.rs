//! Clipping session intervals to a target day.

use chrono::{DateTime, Utc};

use crate::types::TargetDay;

/// The portion of a day that sessions are clipped against.
///
/// `cutoff` is an optional "now" instant; time at or after it is treated
/// as not yet elapsed and never counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub cutoff: Option<DateTime<Utc>>,
}

impl DayWindow {
    /// Window covering the whole of `day`, with no cutoff.
    #[must_use]
    pub fn for_day(day: TargetDay) -> Self {
        Self {
            start: day.start(),
            end: day.end(),
            cutoff: None,
        }
    }

    /// Same window, clipped at `now`.
    #[must_use]
    pub const fn with_cutoff(mut self, now: Option<DateTime<Utc>>) -> Self {
        self.cutoff = now;
        self
    }

    /// Whether `[start, end)` overlaps the day at all.
    ///
    /// Reversed intervals are evaluated as zero-length at `start`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let end = end.max(start);
        start < self.end && end > self.start
    }

    /// Clips `[start, end)` to this window.
    ///
    /// Returns `None` when nothing of the interval remains after clipping.
    pub fn clip(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<ClippedInterval> {
        let effective_end = end.max(start);
        let clip_start = start.max(self.start);
        let mut clip_end = effective_end.min(self.end);
        if let Some(cutoff) = self.cutoff {
            clip_end = clip_end.min(cutoff);
        }

        if clip_end <= clip_start {
            return None;
        }

        Some(ClippedInterval {
            start: clip_start,
            end: clip_end,
            minutes: whole_minutes(clip_start, clip_end),
        })
    }
}

/// A session interval after clipping. Always has `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole minutes in `[start, end)`, truncated.
    pub minutes: u32,
}

/// Whole minutes between two instants, truncated toward zero and floored at zero.
pub(crate) fn whole_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let minutes = (end - start).num_seconds() / 60;
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}
