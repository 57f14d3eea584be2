//! Shared utilities for CLI commands.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use dayuse_core::{JsonFileSource, Session, SessionSource, TargetDay, read_sessions};

use crate::Config;
use crate::cli::DayArgs;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Input path meaning "read sessions from stdin".
const STDIN_INPUT: &str = "-";

/// Parse a datetime string as ISO 8601, `now`, or relative time.
///
/// `reference` stands in for the current time, so one invocation resolves
/// every relative value against the same instant.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - "now"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, reference: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    // Try ISO 8601 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if s.eq_ignore_ascii_case("now") {
        return Ok(reference);
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), 'now', or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    // Safe to create Duration now that we've validated the range
    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(reference - duration)
}

/// Everything an aggregation call needs, resolved up front.
#[derive(Debug)]
pub struct DayRequest {
    pub day: TargetDay,
    pub now: Option<DateTime<Utc>>,
    pub sessions: Vec<Session>,
}

/// Resolves the target day: `--date`, then config `target_date`, then today (UTC).
pub fn resolve_day(
    date: Option<&str>,
    config: &Config,
    clock: DateTime<Utc>,
) -> anyhow::Result<TargetDay> {
    match date.or(config.target_date.as_deref()) {
        Some(value) => Ok(TargetDay::parse(value)?),
        None => Ok(TargetDay::new(clock.date_naive())),
    }
}

/// Resolves the sessions path: `--input`, then config `sessions_path`.
pub fn resolve_input(input: Option<&Path>, config: &Config) -> PathBuf {
    input.map_or_else(|| config.sessions_path.clone(), Path::to_path_buf)
}

/// Loads sessions from a file, or from stdin when `path` is `-`.
pub fn load_sessions(path: &Path) -> anyhow::Result<Vec<Session>> {
    if path.as_os_str() == STDIN_INPUT {
        let stdin = io::stdin();
        return Ok(read_sessions(stdin.lock(), Path::new("<stdin>"))?);
    }
    Ok(JsonFileSource::new(path).load_sessions()?)
}

/// Builds a request from command-line arguments.
///
/// The target date is validated before any input is read, so a bad date
/// fails without touching the session source.
pub fn prepare(args: &DayArgs, config: &Config, clock: DateTime<Utc>) -> anyhow::Result<DayRequest> {
    let day = resolve_day(args.date.as_deref(), config, clock)?;
    let now = args
        .now
        .as_deref()
        .map(|value| parse_datetime(value, clock))
        .transpose()?;
    let path = resolve_input(args.input.as_deref(), config);
    let sessions = load_sessions(&path)?;

    tracing::debug!(%day, ?now, path = %path.display(), sessions = sessions.len(), "prepared request");
    Ok(DayRequest { day, now, sessions })
}
