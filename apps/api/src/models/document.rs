//! Lenient field decoders for JSONB documents.
//!
//! Profile documents are written by many endpoints over time, so readers
//! accept nulls, numbers-as-strings and malformed dates instead of rejecting
//! the whole document.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` decodes as `T::default()` (empty vec, `false`, ...).
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings or numbers. Zero and non-scalar values count as unset.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts `YYYY-MM-DD` or RFC 3339 timestamps; anything else is `None`.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// True iff the value is present and not blank after trimming.
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Doc {
        #[serde(deserialize_with = "null_as_default")]
        skills: Vec<String>,
        #[serde(deserialize_with = "null_as_default")]
        is_current: bool,
        #[serde(deserialize_with = "string_or_number")]
        team_size: Option<String>,
        #[serde(deserialize_with = "lenient_date")]
        start_date: Option<NaiveDate>,
    }

    #[test]
    fn test_nulls_become_defaults() {
        let doc: Doc = serde_json::from_value(json!({
            "skills": null,
            "is_current": null,
            "team_size": null,
            "start_date": null
        }))
        .unwrap();
        assert!(doc.skills.is_empty());
        assert!(!doc.is_current);
        assert_eq!(doc.team_size, None);
        assert_eq!(doc.start_date, None);
    }

    #[test]
    fn test_missing_fields_default() {
        let doc: Doc = serde_json::from_value(json!({})).unwrap();
        assert!(doc.skills.is_empty());
    }

    #[test]
    fn test_number_or_string() {
        let doc: Doc = serde_json::from_value(json!({"team_size": 50})).unwrap();
        assert_eq!(doc.team_size.as_deref(), Some("50"));
        let doc: Doc = serde_json::from_value(json!({"team_size": "11-50"})).unwrap();
        assert_eq!(doc.team_size.as_deref(), Some("11-50"));
        let doc: Doc = serde_json::from_value(json!({"team_size": 0})).unwrap();
        assert_eq!(doc.team_size, None);
    }

    #[test]
    fn test_dates_parse_leniently() {
        assert_eq!(parse_date("2020-01-15"), NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(
            parse_date("2021-03-01T10:00:00.000Z"),
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
        assert_eq!(parse_date("last spring"), None);

        let doc: Doc = serde_json::from_value(json!({"start_date": "garbage"})).unwrap();
        assert_eq!(doc.start_date, None);
        let doc: Doc = serde_json::from_value(json!({"start_date": 12})).unwrap();
        assert_eq!(doc.start_date, None);
    }

    #[test]
    fn test_has_text() {
        assert!(has_text(Some("Rust developer")));
        assert!(!has_text(Some("   ")));
        assert!(!has_text(None));
    }
}
