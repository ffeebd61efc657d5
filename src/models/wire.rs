//! Lenient deserializers for the portal's REST payloads.
//!
//! The collection endpoints are backed by different ORM models, so ids show up
//! either as strings or integers and dates either as full timestamps or as
//! bare calendar days.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Uint(u64),
}

/// Accept a JSON string or integer and normalize it to a string.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Deserialize a timestamp with [`parse_timestamp`].
pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
}

/// Like [`flexible_datetime`] for optional fields; `null` is `None`.
pub fn flexible_datetime_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(deserialize_with = "flexible_datetime")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_numeric_id_is_normalized() {
        let p: Stamped = serde_json::from_str(r#"{"id": 42, "at": "2024-03-01"}"#).unwrap();
        assert_eq!(p.id, "42");
    }

    #[test]
    fn test_string_id_is_kept() {
        let p: Stamped =
            serde_json::from_str(r#"{"id": "abc-1", "at": "2024-03-01T10:00:00Z"}"#).unwrap();
        assert_eq!(p.id, "abc-1");
        assert_eq!(p.at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_bare_date_is_midnight_utc() {
        let ts = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_offset_is_converted() {
        let ts = parse_timestamp("2024-03-01T02:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[derive(Deserialize)]
    struct Window {
        #[serde(default, deserialize_with = "flexible_datetime_opt")]
        until: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_optional_timestamp_accepts_bare_date_null_and_absence() {
        let w: Window = serde_json::from_str(r#"{"until": "2024-08-01"}"#).unwrap();
        assert_eq!(w.until.unwrap().to_rfc3339(), "2024-08-01T00:00:00+00:00");

        let w: Window = serde_json::from_str(r#"{"until": null}"#).unwrap();
        assert!(w.until.is_none());

        let w: Window = serde_json::from_str("{}").unwrap();
        assert!(w.until.is_none());

        assert!(serde_json::from_str::<Window>(r#"{"until": "later"}"#).is_err());
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        assert!(parse_timestamp("next tuesday").is_none());
        let res: Result<Stamped, _> = serde_json::from_str(r#"{"id": 1, "at": "soon"}"#);
        assert!(res.is_err());
    }
}
