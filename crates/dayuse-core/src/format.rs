//! Display formatting for aggregated minutes.

/// Formats `part` as a percentage of `total`.
///
/// Returns "0%" when `total` is zero. Values strictly between 0 and 1 keep
/// one decimal ("0.4%") so small shares do not read as zero; everything else
/// is rounded half-up to a whole percent.
pub fn percentage_of(part: u32, total: u32) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let percent = 100.0 * f64::from(part) / f64::from(total);
    if percent > 0.0 && percent < 1.0 {
        format!("{percent:.1}%")
    } else {
        // f64::round rounds half away from zero, which is half-up for non-negative values
        format!("{:.0}%", percent.round())
    }
}

/// Formats minutes as "Xh Ym", or "Ym" under one hour.
pub fn hours_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
