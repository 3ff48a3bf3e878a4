//! Serde helper functions for search parameter deserialization.
//!
//! These functions handle the quirks of query-string submissions where
//! empty strings, numbers sent as text, and unknown values should all be
//! treated leniently instead of rejecting the request.

use serde::{Deserialize, Deserializer};

use crate::storage::SortDirection;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

/// Deserialize an optional positive count.
///
/// Accepts JSON numbers and numeric strings. Zero, negative and
/// unparseable values become None so the caller falls back to its default.
pub fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrText> = Option::deserialize(deserializer)?;
    let parsed = match value {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<i64>().ok(),
        None => None,
    };
    Ok(parsed.filter(|n| *n > 0).map(|n| n as u64))
}

/// Deserialize an optional sort direction, case-insensitively.
/// Unknown directions become None.
pub fn deserialize_optional_sort_dir<'de, D>(
    deserializer: D,
) -> Result<Option<SortDirection>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.parse().ok()))
}
