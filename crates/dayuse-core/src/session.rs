//! Raw usage sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single recorded interval of app usage.
///
/// Sessions are taken as recorded. An `end` earlier than `start` is not
/// rejected here; aggregation treats such a session as zero-length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier from the recording source.
    #[serde(rename = "session_id")]
    pub id: String,
    /// App name; grouping key, compared case-sensitively.
    pub app_name: String,
    /// Category label as recorded, before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "start_timestamp", deserialize_with = "deserialize_instant")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_timestamp", deserialize_with = "deserialize_instant")]
    pub end: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        app_name: impl Into<String>,
        category: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            app_name: app_name.into(),
            category: category.map(str::to_string),
            start,
            end,
        }
    }
}

/// A session suitable for aggregation.
///
/// This trait lets aggregation run over different session representations
/// (e.g., [`Session`] decoded from JSON, or caller-owned records).
pub trait UsageSession {
    /// Returns the app name used as the grouping key.
    fn app_name(&self) -> &str;

    /// Returns the raw category label, if any.
    fn category(&self) -> Option<&str>;

    /// Returns when the session started.
    fn start(&self) -> DateTime<Utc>;

    /// Returns when the session ended.
    fn end(&self) -> DateTime<Utc>;
}

impl UsageSession for Session {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl<T: UsageSession + ?Sized> UsageSession for &T {
    fn app_name(&self) -> &str {
        (**self).app_name()
    }

    fn category(&self) -> Option<&str> {
        (**self).category()
    }

    fn start(&self) -> DateTime<Utc> {
        (**self).start()
    }

    fn end(&self) -> DateTime<Utc> {
        (**self).end()
    }
}

/// Instants arrive either as RFC 3339 text with an offset or as epoch seconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    EpochSeconds(i64),
    Text(String),
}

fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawInstant::deserialize(deserializer)? {
        RawInstant::EpochSeconds(secs) => DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            serde::de::Error::custom(format!("epoch seconds out of range: {secs}"))
        }),
        RawInstant::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| serde::de::Error::custom(format!("invalid timestamp {text:?}: {err}"))),
    }
}
