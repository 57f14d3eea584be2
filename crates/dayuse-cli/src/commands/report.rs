//! Report command for rendering one day of usage.
//!
//! This module implements `dayuse report` and its narrower views
//! (`apps`, `categories`, `hourly`) in human-readable and JSON formats.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use dayuse_core::{
    AppAggregate, AppRowItem, CategoryAggregate, HourBucket, TargetDay, UsageAggregator,
    UsageSummary, hours_minutes, percentage_of,
};

use super::util::DayRequest;

/// Which part of the day summary to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Full,
    Apps,
    Categories,
    Hourly,
}

// ========== Progress Bar ==========

/// Minutes in a fully used hour; hourly bars are scaled against it.
const MINUTES_PER_HOUR: u32 = 60;

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(value: u32, max: u32) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = f64::from(value) / f64::from(max);
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        // Clamp to 10 in case value > max
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Text Sections ==========

/// Formats the day for the report header, e.g. "Monday, Feb 23, 2026".
fn format_day(day: TargetDay) -> String {
    day.date().format("%A, %b %-d, %Y").to_string()
}

fn write_categories(output: &mut String, categories: &[CategoryAggregate], total: u32) {
    for category in categories {
        writeln!(
            output,
            "{:<20} {:>7} {:>5}",
            category.category,
            hours_minutes(category.total_minutes),
            percentage_of(category.total_minutes, total)
        )
        .unwrap();
    }
}

fn write_apps(output: &mut String, rows: &[AppRowItem]) {
    for row in rows {
        writeln!(
            output,
            "{:<20} {:<16} {:>7}  {}",
            row.app_name,
            row.category,
            hours_minutes(row.total_minutes),
            row.sessions_text()
        )
        .unwrap();
    }
}

fn write_hours(output: &mut String, buckets: &[HourBucket], indent: &str) {
    for bucket in buckets.iter().filter(|b| b.minutes > 0) {
        writeln!(
            output,
            "{indent}{:02}:00  {:>5}  {}",
            bucket.hour,
            hours_minutes(bucket.minutes),
            progress_bar(bucket.minutes, MINUTES_PER_HOUR)
        )
        .unwrap();
    }
}

fn write_empty(output: &mut String, day: TargetDay) {
    writeln!(output, "No usage recorded on {day}.").unwrap();
}

/// Formats the full human-readable report.
pub fn format_report(summary: &UsageSummary, day: TargetDay) -> String {
    let mut output = String::new();

    writeln!(output, "USAGE REPORT: {}", format_day(day)).unwrap();

    if summary.daily.apps.is_empty() {
        writeln!(output).unwrap();
        write_empty(&mut output, day);
        return output;
    }

    writeln!(output, "Total: {}", hours_minutes(summary.total_minutes)).unwrap();

    writeln!(output).unwrap();
    writeln!(output, "BY CATEGORY").unwrap();
    writeln!(output, "───────────").unwrap();
    write_categories(&mut output, &summary.categories, summary.total_minutes);

    writeln!(output).unwrap();
    writeln!(output, "BY APP").unwrap();
    writeln!(output, "──────").unwrap();
    write_apps(&mut output, &summary.rows);

    writeln!(output).unwrap();
    writeln!(output, "BY HOUR").unwrap();
    writeln!(output, "───────").unwrap();
    write_hours(&mut output, &summary.daily.hourly_totals(), "");

    output
}

/// Formats only the app list.
pub fn format_apps(summary: &UsageSummary, day: TargetDay) -> String {
    let mut output = String::new();
    if summary.rows.is_empty() {
        write_empty(&mut output, day);
    } else {
        write_apps(&mut output, &summary.rows);
    }
    output
}

/// Formats only the category breakdown.
pub fn format_categories(summary: &UsageSummary, day: TargetDay) -> String {
    let mut output = String::new();
    if summary.categories.is_empty() {
        write_empty(&mut output, day);
    } else {
        write_categories(&mut output, &summary.categories, summary.total_minutes);
    }
    output
}

/// Formats each app's hours, most-used app first.
pub fn format_hourly(summary: &UsageSummary, day: TargetDay) -> String {
    let mut output = String::new();
    if summary.daily.apps.is_empty() {
        write_empty(&mut output, day);
        return output;
    }

    for (idx, app) in summary.daily.apps.iter().enumerate() {
        if idx > 0 {
            writeln!(output).unwrap();
        }
        writeln!(
            output,
            "{} ({}): {}",
            app.app_name,
            app.category,
            hours_minutes(app.total_minutes)
        )
        .unwrap();
        write_hours(&mut output, &app.hourly, "  ");
    }
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub date: String,
    pub total_minutes: u32,
    pub categories: Vec<JsonCategory>,
    pub apps: Vec<JsonApp>,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory {
    pub category: String,
    pub total_minutes: u32,
    pub percentage: String,
}

#[derive(Debug, Serialize)]
pub struct JsonApp {
    pub app_name: String,
    pub category: String,
    pub total_minutes: u32,
    pub session_count: u32,
    pub sessions_text: String,
    /// Minutes per hour, index = hour of day.
    pub hourly: Vec<u32>,
}

fn json_categories(summary: &UsageSummary) -> Vec<JsonCategory> {
    summary
        .categories
        .iter()
        .map(|c| JsonCategory {
            category: c.category.clone(),
            total_minutes: c.total_minutes,
            percentage: percentage_of(c.total_minutes, summary.total_minutes),
        })
        .collect()
}

fn json_app(app: &AppAggregate) -> JsonApp {
    JsonApp {
        app_name: app.app_name.clone(),
        category: app.category.clone(),
        total_minutes: app.total_minutes,
        session_count: app.session_count,
        sessions_text: app.sessions_text(),
        hourly: app.hourly.iter().map(|b| b.minutes).collect(),
    }
}

/// Formats the selected view as JSON.
pub fn format_json(summary: &UsageSummary, view: View) -> Result<String> {
    let output = match view {
        View::Full => serde_json::to_string_pretty(&JsonReport {
            date: summary.daily.date.clone(),
            total_minutes: summary.total_minutes,
            categories: json_categories(summary),
            apps: summary.daily.apps.iter().map(json_app).collect(),
        })?,
        View::Apps => serde_json::to_string_pretty(&summary.rows)?,
        View::Categories => serde_json::to_string_pretty(&json_categories(summary))?,
        View::Hourly => serde_json::to_string_pretty(&summary.daily)?,
    };
    Ok(output)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, request: &DayRequest, view: View, json: bool) -> Result<()> {
    let summary = UsageAggregator::new(request.day)
        .with_now(request.now)
        .summarize(&request.sessions);

    if json {
        writeln!(writer, "{}", format_json(&summary, view)?)?;
    } else {
        let output = match view {
            View::Full => format_report(&summary, request.day),
            View::Apps => format_apps(&summary, request.day),
            View::Categories => format_categories(&summary, request.day),
            View::Hourly => format_hourly(&summary, request.day),
        };
        write!(writer, "{output}")?;
    }

    Ok(())
}
