//! Category label normalization.

/// Label used for sessions with no usable category.
pub const OTHER_CATEGORY: &str = "Other";

/// Returns the display label for a raw category.
///
/// Missing, empty, and whitespace-only values collapse to `"Other"`, as do
/// case-insensitive spellings of `other` and `others`. Anything else is
/// returned verbatim with its case preserved.
pub fn normalize_category(raw: Option<&str>) -> &str {
    let Some(name) = raw else {
        return OTHER_CATEGORY;
    };
    let trimmed = name.trim();
    if trimmed.is_empty()
        || name.eq_ignore_ascii_case("other")
        || name.eq_ignore_ascii_case("others")
    {
        return OTHER_CATEGORY;
    }
    name
}
