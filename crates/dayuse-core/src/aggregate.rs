//! Daily usage aggregation.
//!
//! Folds raw sessions into the three views a day summary needs:
//!
//! 1. [`DailyUsage`]: per-app totals with 24 hour-of-day buckets
//! 2. [`CategoryAggregate`]: per-category totals
//! 3. [`AppRowItem`]: per-app totals with session counts
//!
//! All three come out of one grouping pass over the clipped sessions, so they
//! always agree on totals and on each app's category label.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::category::normalize_category;
use crate::clip::DayWindow;
use crate::hourly::{HourBucket, HourlyMinutes};
use crate::session::UsageSession;
use crate::types::TargetDay;

/// Usage of one app over the target day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppAggregate {
    pub app_name: String,
    /// Normalized category label.
    pub category: String,
    pub total_minutes: u32,
    /// Sessions that contributed at least one minute.
    pub session_count: u32,
    /// Exactly 24 buckets, hour 0 first.
    pub hourly: Vec<HourBucket>,
}

impl AppAggregate {
    /// "1 session" or "N sessions".
    pub fn sessions_text(&self) -> String {
        sessions_text(self.session_count)
    }
}

/// Total usage of one category over the target day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub total_minutes: u32,
}

/// List row for one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRowItem {
    pub app_name: String,
    pub category: String,
    pub total_minutes: u32,
    pub session_count: u32,
}

impl AppRowItem {
    /// "1 session" or "N sessions".
    pub fn sessions_text(&self) -> String {
        sessions_text(self.session_count)
    }
}

/// Per-app usage for one day, most-used app first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyUsage {
    /// The day as `yyyy-MM-dd`.
    pub date: String,
    pub apps: Vec<AppAggregate>,
}

impl DailyUsage {
    /// Minutes across all apps.
    pub fn total_minutes(&self) -> u32 {
        self.apps.iter().map(|app| app.total_minutes).sum()
    }

    /// Minutes per hour summed across all apps.
    pub fn hourly_totals(&self) -> Vec<HourBucket> {
        let mut totals = HourlyMinutes::new();
        for bucket in self.apps.iter().flat_map(|app| &app.hourly) {
            totals.add_minutes(bucket.hour, bucket.minutes);
        }
        totals.buckets()
    }
}

/// Every view of a day, computed from a single grouping pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub daily: DailyUsage,
    pub categories: Vec<CategoryAggregate>,
    pub rows: Vec<AppRowItem>,
    pub total_minutes: u32,
}

/// Aggregates sessions for one target day.
///
/// The optional "now" cutoff is fixed at construction so every view computed
/// by one aggregator sees the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageAggregator {
    day: TargetDay,
    window: DayWindow,
}

impl UsageAggregator {
    #[must_use]
    pub fn new(day: TargetDay) -> Self {
        Self {
            day,
            window: DayWindow::for_day(day),
        }
    }

    /// Excludes time at or after `now` from every view.
    #[must_use]
    pub const fn with_now(mut self, now: Option<DateTime<Utc>>) -> Self {
        self.window = self.window.with_cutoff(now);
        self
    }

    pub const fn day(&self) -> TargetDay {
        self.day
    }

    pub const fn window(&self) -> DayWindow {
        self.window
    }

    /// Per-app totals with hourly buckets.
    pub fn daily_usage<S: UsageSession>(&self, sessions: &[S]) -> DailyUsage {
        let groups = self.group(sessions);
        self.to_daily(&groups)
    }

    /// Per-category totals, zero-minute categories omitted.
    pub fn category_breakdown<S: UsageSession>(&self, sessions: &[S]) -> Vec<CategoryAggregate> {
        to_categories(&self.group(sessions))
    }

    /// Per-app totals with session counts.
    pub fn app_rows<S: UsageSession>(&self, sessions: &[S]) -> Vec<AppRowItem> {
        to_rows(&self.group(sessions))
    }

    /// All views at once.
    pub fn summarize<S: UsageSession>(&self, sessions: &[S]) -> UsageSummary {
        let groups = self.group(sessions);
        let daily = self.to_daily(&groups);
        let total_minutes = daily.total_minutes();
        UsageSummary {
            categories: to_categories(&groups),
            rows: to_rows(&groups),
            daily,
            total_minutes,
        }
    }

    /// Groups clipped sessions by app, in order of each app's first
    /// contributing session.
    fn group<'a, S: UsageSession>(&self, sessions: &'a [S]) -> Vec<AppGroup<'a>> {
        let mut groups: Vec<AppGroup<'a>> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut excluded = 0usize;

        for session in sessions {
            let (start, end) = (session.start(), session.end());
            if end < start {
                tracing::trace!(app = session.app_name(), %start, %end, "end before start, treating as zero-length");
            }
            if !self.window.overlaps(start, end) {
                excluded += 1;
                continue;
            }
            let Some(interval) = self.window.clip(start, end) else {
                excluded += 1;
                continue;
            };
            if interval.minutes == 0 {
                tracing::trace!(app = session.app_name(), "session under one minute after clipping");
                excluded += 1;
                continue;
            }

            let app_name = session.app_name();
            let slot = *index.entry(app_name).or_insert_with(|| {
                groups.push(AppGroup {
                    app_name,
                    // First contributing session fixes the label
                    category: normalize_category(session.category()),
                    total_minutes: 0,
                    session_count: 0,
                    hourly: HourlyMinutes::new(),
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            group.total_minutes += interval.minutes;
            group.session_count += 1;
            group.hourly.add(&interval);
        }

        tracing::debug!(
            day = %self.day,
            sessions = sessions.len(),
            excluded,
            apps = groups.len(),
            "grouped sessions"
        );
        groups
    }

    fn to_daily(&self, groups: &[AppGroup<'_>]) -> DailyUsage {
        let mut apps: Vec<AppAggregate> = groups
            .iter()
            .map(|group| AppAggregate {
                app_name: group.app_name.to_string(),
                category: group.category.to_string(),
                total_minutes: group.total_minutes,
                session_count: group.session_count,
                hourly: group.hourly.buckets(),
            })
            .collect();
        apps.sort_by_key(|app| Reverse(app.total_minutes));

        DailyUsage {
            date: self.day.to_string(),
            apps,
        }
    }
}

/// Convenience wrapper: aggregates `sessions` for `day`, clipped at `now`.
pub fn summarize_day<S: UsageSession>(
    sessions: &[S],
    day: TargetDay,
    now: Option<DateTime<Utc>>,
) -> UsageSummary {
    UsageAggregator::new(day).with_now(now).summarize(sessions)
}

/// Running totals for one app during grouping.
#[derive(Debug)]
struct AppGroup<'a> {
    app_name: &'a str,
    category: &'a str,
    total_minutes: u32,
    session_count: u32,
    hourly: HourlyMinutes,
}

fn to_categories(groups: &[AppGroup<'_>]) -> Vec<CategoryAggregate> {
    let mut categories: Vec<CategoryAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for group in groups {
        let slot = *index.entry(group.category).or_insert_with(|| {
            categories.push(CategoryAggregate {
                category: group.category.to_string(),
                total_minutes: 0,
            });
            categories.len() - 1
        });
        categories[slot].total_minutes += group.total_minutes;
    }

    categories.retain(|c| c.total_minutes > 0);
    categories.sort_by_key(|c| Reverse(c.total_minutes));
    categories
}

fn to_rows(groups: &[AppGroup<'_>]) -> Vec<AppRowItem> {
    let mut rows: Vec<AppRowItem> = groups
        .iter()
        .map(|group| AppRowItem {
            app_name: group.app_name.to_string(),
            category: group.category.to_string(),
            total_minutes: group.total_minutes,
            session_count: group.session_count,
        })
        .collect();
    rows.sort_by_key(|row| Reverse(row.total_minutes));
    rows
}

fn sessions_text(count: u32) -> String {
    if count == 1 {
        "1 session".to_string()
    } else {
        format!("{count} sessions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::percentage_of;
    use crate::hourly::HOURS_PER_DAY;
    use crate::session::Session;
    use chrono::{Duration, TimeZone};

    fn ts(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid test timestamp")
            .with_timezone(&Utc)
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 23, hour, min, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn session(app: &str, category: Option<&str>, start: DateTime<Utc>, end: DateTime<Utc>) -> Session {
        Session::new(format!("{app}-{start}"), app, category, start, end)
    }

    fn aggregator() -> UsageAggregator {
        UsageAggregator::new(TargetDay::parse("2026-02-23").unwrap())
    }

    fn find<'a>(daily: &'a DailyUsage, app: &str) -> Option<&'a AppAggregate> {
        daily.apps.iter().find(|a| a.app_name == app)
    }

    fn hourly_sum(app: &AppAggregate) -> u32 {
        app.hourly.iter().map(|b| b.minutes).sum()
    }

    // Clock 08:10 -> 09:15 on the target day
    #[test]
    fn test_single_session_within_day() {
        let sessions = vec![session(
            "Clock",
            Some("System"),
            ts("2026-02-23T08:10:00Z"),
            ts("2026-02-23T09:15:00Z"),
        )];

        let summary = aggregator().summarize(&sessions);

        assert_eq!(summary.daily.date, "2026-02-23");
        let clock = find(&summary.daily, "Clock").expect("Clock should exist");
        assert_eq!(clock.total_minutes, 65);
        assert_eq!(clock.category, "System");
        assert_eq!(clock.hourly.len(), HOURS_PER_DAY);
        assert_eq!(clock.hourly[8].minutes, 50);
        assert_eq!(clock.hourly[9].minutes, 15);
        assert!(
            clock
                .hourly
                .iter()
                .filter(|b| b.hour != 8 && b.hour != 9)
                .all(|b| b.minutes == 0)
        );

        assert_eq!(
            summary.categories,
            vec![CategoryAggregate {
                category: "System".to_string(),
                total_minutes: 65,
            }]
        );
        assert_eq!(percentage_of(65, summary.total_minutes), "100%");
    }

    #[test]
    fn test_malformed_session_is_dropped() {
        let sessions = vec![session(
            "Clock",
            Some("System"),
            ts("2026-02-23T08:05:00Z"),
            ts("2026-02-23T08:00:00Z"),
        )];

        let summary = aggregator().summarize(&sessions);

        assert!(summary.daily.apps.is_empty());
        assert!(summary.categories.is_empty());
        assert!(summary.rows.is_empty());
        assert_eq!(summary.total_minutes, 0);
    }

    #[test]
    fn test_malformed_session_does_not_affect_other_sessions_of_app() {
        let sessions = vec![
            session("Clock", Some("System"), at(8, 5), at(8, 0)),
            session("Clock", Some("System"), at(10, 0), at(10, 30)),
        ];

        let rows = aggregator().app_rows(&sessions);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_minutes, 30);
        assert_eq!(rows[0].session_count, 1);
    }

    #[test]
    fn test_session_crossing_midnight_counts_only_target_day() {
        let sessions = vec![session(
            "Clock",
            Some("System"),
            ts("2026-02-22T23:40:00Z"),
            ts("2026-02-23T00:20:00Z"),
        )];

        let daily = aggregator().daily_usage(&sessions);

        let clock = find(&daily, "Clock").expect("Clock should exist");
        assert_eq!(clock.total_minutes, 20);
        assert_eq!(clock.hourly[0].minutes, 20);
        assert_eq!(hourly_sum(clock), 20);
    }

    #[test]
    fn test_session_crossing_into_next_day_is_capped() {
        let sessions = vec![session(
            "Video",
            Some("Entertainment"),
            ts("2026-02-23T23:30:00Z"),
            ts("2026-02-24T01:00:00Z"),
        )];

        let daily = aggregator().daily_usage(&sessions);

        let video = find(&daily, "Video").expect("Video should exist");
        assert_eq!(video.total_minutes, 30);
        assert_eq!(video.hourly[23].minutes, 30);
    }

    #[test]
    fn test_sessions_outside_day_are_excluded() {
        let day = aggregator().day();
        let sessions = vec![
            // Entirely before
            session("Early", None, day.start() - Duration::hours(3), day.start() - Duration::hours(1)),
            // Ends exactly at day start
            session("Edge", None, day.start() - Duration::hours(1), day.start()),
            // Starts exactly at day end
            session("Late", None, day.end(), day.end() + Duration::hours(1)),
            session("Inside", None, at(12, 0), at(12, 10)),
        ];

        let summary = aggregator().summarize(&sessions);

        let names: Vec<_> = summary.daily.apps.iter().map(|a| a.app_name.as_str()).collect();
        assert_eq!(names, vec!["Inside"]);
        assert_eq!(summary.total_minutes, 10);
    }

    #[test]
    fn test_sub_minute_sessions_do_not_create_apps() {
        let sessions = vec![session(
            "Blink",
            Some("Utilities"),
            at(9, 0),
            at(9, 0) + Duration::seconds(59),
        )];

        let summary = aggregator().summarize(&sessions);

        assert!(summary.daily.apps.is_empty());
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_sub_minute_session_does_not_count_as_session() {
        let sessions = vec![
            session("Mail", Some("Productivity"), at(9, 0), at(9, 20)),
            session("Mail", Some("Productivity"), at(10, 0), at(10, 0) + Duration::seconds(30)),
        ];

        let rows = aggregator().app_rows(&sessions);

        assert_eq!(rows[0].session_count, 1);
        assert_eq!(rows[0].sessions_text(), "1 session");
    }

    #[test]
    fn test_conservation_for_contained_sessions() {
        let sessions = vec![
            session("Mail", Some("Productivity"), at(7, 15), at(7, 55)),
            session("Chat", Some("Social"), at(8, 50), at(10, 5)),
            session("Mail", Some("Productivity"), at(13, 0), at(15, 30)),
            session("Maps", None, at(18, 59), at(19, 1)),
        ];

        let summary = aggregator().summarize(&sessions);

        let expected: i64 = sessions.iter().map(|s| (s.end - s.start).num_minutes()).sum();
        assert_eq!(i64::from(summary.total_minutes), expected);
        let category_total: u32 = summary.categories.iter().map(|c| c.total_minutes).sum();
        assert_eq!(category_total, summary.total_minutes);
        let row_total: u32 = summary.rows.iter().map(|r| r.total_minutes).sum();
        assert_eq!(row_total, summary.total_minutes);
    }

    #[test]
    fn test_hour_buckets_sum_to_total() {
        let sessions = vec![
            session("Mail", Some("Productivity"), at(7, 15), at(7, 55)),
            session("Chat", Some("Social"), at(8, 50), at(10, 5)),
            session(
                "Chat",
                Some("Social"),
                at(11, 0) + Duration::seconds(20),
                at(12, 30) + Duration::seconds(10),
            ),
            session("Music", Some("Entertainment"), ts("2026-02-22T22:00:00Z"), ts("2026-02-24T02:00:00Z")),
        ];

        let daily = aggregator().daily_usage(&sessions);

        for app in &daily.apps {
            assert_eq!(hourly_sum(app), app.total_minutes, "{}", app.app_name);
        }
        let music = find(&daily, "Music").unwrap();
        assert_eq!(music.total_minutes, 1440);
    }

    #[test]
    fn test_counts_sessions_per_app() {
        let sessions = vec![
            session("Chat", Some("Social"), at(8, 0), at(8, 10)),
            session("Mail", Some("Productivity"), at(9, 0), at(9, 5)),
            session("Chat", Some("Social"), at(10, 0), at(10, 10)),
            session("Chat", Some("Social"), at(11, 0), at(11, 10)),
        ];

        let rows = aggregator().app_rows(&sessions);

        assert_eq!(rows[0].app_name, "Chat");
        assert_eq!(rows[0].session_count, 3);
        assert_eq!(rows[0].sessions_text(), "3 sessions");
        assert_eq!(rows[1].session_count, 1);
    }

    #[test]
    fn test_app_names_are_case_sensitive() {
        let sessions = vec![
            session("chat", Some("Social"), at(8, 0), at(8, 10)),
            session("Chat", Some("Social"), at(9, 0), at(9, 20)),
        ];

        let rows = aggregator().app_rows(&sessions);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].app_name, "Chat");
        assert_eq!(rows[1].app_name, "chat");
        let categories = aggregator().category_breakdown(&sessions);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].total_minutes, 30);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let sessions = vec![
            session("Bravo", Some("B"), at(8, 0), at(8, 30)),
            session("Alpha", Some("A"), at(9, 0), at(9, 30)),
            session("Charlie", Some("C"), at(10, 0), at(11, 0)),
        ];

        let summary = aggregator().summarize(&sessions);

        let apps: Vec<_> = summary.daily.apps.iter().map(|a| a.app_name.as_str()).collect();
        assert_eq!(apps, vec!["Charlie", "Bravo", "Alpha"]);
        let rows: Vec<_> = summary.rows.iter().map(|r| r.app_name.as_str()).collect();
        assert_eq!(rows, vec!["Charlie", "Bravo", "Alpha"]);
        let categories: Vec<_> = summary.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_categories_are_normalized() {
        let sessions = vec![
            session("A", None, at(8, 0), at(8, 10)),
            session("B", Some(""), at(9, 0), at(9, 10)),
            session("C", Some("OTHERS"), at(10, 0), at(10, 10)),
            session("D", Some("other"), at(11, 0), at(11, 10)),
            session("E", Some("Social"), at(12, 0), at(12, 5)),
        ];

        let summary = aggregator().summarize(&sessions);

        assert_eq!(
            summary.categories,
            vec![
                CategoryAggregate {
                    category: "Other".to_string(),
                    total_minutes: 40,
                },
                CategoryAggregate {
                    category: "Social".to_string(),
                    total_minutes: 5,
                },
            ]
        );
        assert!(
            summary
                .rows
                .iter()
                .filter(|r| r.app_name != "E")
                .all(|r| r.category == "Other")
        );
    }

    #[test]
    fn test_first_contributing_category_wins_for_app() {
        let sessions = vec![
            // Reversed, so it contributes nothing and cannot fix the label
            session("Browser", Some("Reference"), at(7, 5), at(7, 0)),
            session("Browser", Some("Productivity"), at(8, 0), at(8, 30)),
            session("Browser", Some("Social"), at(9, 0), at(10, 0)),
        ];

        let summary = aggregator().summarize(&sessions);

        assert_eq!(summary.rows[0].category, "Productivity");
        assert_eq!(summary.daily.apps[0].category, "Productivity");
        // The breakdown attributes all of the app's minutes to the same label
        assert_eq!(
            summary.categories,
            vec![CategoryAggregate {
                category: "Productivity".to_string(),
                total_minutes: 90,
            }]
        );
    }

    #[test]
    fn test_now_cutoff_excludes_future_minutes() {
        let sessions = vec![
            session("Chat", Some("Social"), at(8, 0), at(9, 0)),
            session("Mail", Some("Productivity"), at(10, 0), at(11, 0)),
        ];

        let summary = aggregator().with_now(Some(at(8, 45))).summarize(&sessions);

        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].app_name, "Chat");
        assert_eq!(summary.rows[0].total_minutes, 45);
        assert_eq!(summary.daily.apps[0].hourly[8].minutes, 45);
        assert_eq!(summary.categories[0].total_minutes, 45);
        assert_eq!(summary.total_minutes, 45);
    }

    #[test]
    fn test_now_cutoff_after_day_changes_nothing() {
        let sessions = vec![session("Chat", Some("Social"), at(8, 0), at(9, 0))];
        let day = aggregator().day();

        let with_cutoff = aggregator()
            .with_now(Some(day.end() + Duration::days(3)))
            .summarize(&sessions);
        let without = aggregator().summarize(&sessions);

        assert_eq!(with_cutoff, without);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let sessions = vec![
            session("Zeta", Some("Z"), at(8, 0), at(8, 20)),
            session("Alpha", Some("A"), at(9, 0), at(9, 20)),
            session("Mid", Some("M"), at(10, 0), at(10, 20)),
            session("Alpha", Some("A"), at(11, 0), at(11, 20)),
        ];
        let agg = aggregator().with_now(Some(at(23, 0)));

        let first = serde_json::to_string(&agg.summarize(&sessions)).unwrap();
        for _ in 0..10 {
            let again = serde_json::to_string(&agg.summarize(&sessions)).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_views_match_summary() {
        let sessions = vec![
            session("Chat", Some("Social"), at(8, 0), at(9, 0)),
            session("Mail", None, at(10, 0), at(10, 25)),
        ];
        let agg = aggregator();
        let summary = agg.summarize(&sessions);

        assert_eq!(agg.daily_usage(&sessions), summary.daily);
        assert_eq!(agg.category_breakdown(&sessions), summary.categories);
        assert_eq!(agg.app_rows(&sessions), summary.rows);
        assert_eq!(
            summarize_day(&sessions, agg.day(), None),
            summary
        );
    }

    #[test]
    fn test_daily_hourly_totals_merge_apps() {
        let sessions = vec![
            session("Chat", Some("Social"), at(8, 30), at(9, 10)),
            session("Mail", None, at(8, 45), at(9, 0)),
        ];

        let totals = aggregator().daily_usage(&sessions).hourly_totals();

        assert_eq!(totals.len(), HOURS_PER_DAY);
        assert_eq!(totals[8].minutes, 45);
        assert_eq!(totals[9].minutes, 10);
    }

    #[test]
    fn test_empty_input_yields_empty_views() {
        let sessions: Vec<Session> = Vec::new();
        let summary = aggregator().summarize(&sessions);

        assert_eq!(summary.daily.date, "2026-02-23");
        assert!(summary.daily.apps.is_empty());
        assert!(summary.categories.is_empty());
        assert!(summary.rows.is_empty());
    }

    #[test]
    fn test_works_over_borrowed_sessions() {
        let owned = [session("Chat", Some("Social"), at(8, 0), at(8, 30))];
        let borrowed: Vec<&Session> = owned.iter().collect();

        let rows = aggregator().app_rows(&borrowed);

        assert_eq!(rows[0].total_minutes, 30);
    }
}
