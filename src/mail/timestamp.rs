//! Lenient timestamp parsing for provider message records.
//!
//! A single malformed timestamp must not sink a whole batch, so every
//! timestamp field deserializes through [`lenient`], which degrades to
//! `None` instead of erroring.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

/// Zone-less layouts accepted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp string into UTC.
///
/// - RFC 3339 (`2026-02-15T10:00:00Z`, `...+02:00`) is converted to UTC.
/// - Numeric offsets without a colon (`+0200`) are accepted.
/// - Values without zone information are assumed to already be UTC.
///
/// Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Serde adapter: any unparseable or wrongly typed value becomes `None`.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => {
            let parsed = parse_timestamp(&s);
            if parsed.is_none() {
                debug!(raw = %s, "Unparseable timestamp, treating as absent");
            }
            parsed
        }
        Some(other) => {
            debug!(raw = %other, "Non-string timestamp, treating as absent");
            None
        }
    })
}
