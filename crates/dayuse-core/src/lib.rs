//! Core domain logic for daily app-usage summaries.
//!
//! This crate contains the fundamental types and logic for:
//! - Clipping: restricting sessions to one UTC calendar day and a "now" cutoff
//! - Hourly distribution: spreading clipped minutes over hour-of-day buckets
//! - Aggregation: per-app, per-category, and list-row views of a day
//! - Formatting: percentage and duration strings for display

mod aggregate;
pub mod category;
pub mod clip;
mod error;
pub mod format;
pub mod hourly;
pub mod session;
pub mod source;
mod types;

pub use aggregate::{
    AppAggregate, AppRowItem, CategoryAggregate, DailyUsage, UsageAggregator, UsageSummary,
    summarize_day,
};
pub use category::{OTHER_CATEGORY, normalize_category};
pub use error::UsageError;
pub use format::{hours_minutes, percentage_of};
pub use hourly::{HOURS_PER_DAY, HourBucket};
pub use session::{Session, UsageSession};
pub use source::{JsonFileSource, SessionSource, read_sessions};
pub use types::{DATE_FORMAT, TargetDay};
