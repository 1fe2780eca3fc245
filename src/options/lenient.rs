//! Forgiving deserializers for records coming from the persistence service.
//!
//! Records are hand-edited in a web form, so numbers may arrive as strings,
//! nulls, or garbage, and unset dates arrive as empty strings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serializer};

/// Read a number, treating null, non-numeric text and non-finite values as 0.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Raw::Other(_) => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}

/// Read an optional value, treating anything that does not parse as unset.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw<T>>::deserialize(deserializer)? {
        Some(Raw::Value(value)) => Some(value),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Like [`optional`], falling back to the type's default when unset or unreadable.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(optional(deserializer)?.unwrap_or_default())
}

/// Read a timestamp that may be a full RFC 3339 string or a bare date
/// (midnight UTC). Missing or unreadable values fall back to the epoch.
pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let raw = raw.unwrap_or_default();
    let raw = raw.trim();
    Ok(DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
        .unwrap_or_default())
}

/// Optional ISO date stored as a string; "" means not set.
pub mod date {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    /// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp. Anything else is unset.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(date::parse("2026-01-15"), NaiveDate::from_ymd_opt(2026, 1, 15));
        assert_eq!(
            date::parse("2026-01-15T10:30:00Z"),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
        assert_eq!(date::parse(""), None);
        assert_eq!(date::parse("   "), None);
        assert_eq!(date::parse("next spring"), None);
    }

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "number")]
        amount: f64,
        #[serde(default, deserialize_with = "timestamp")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "optional")]
        tier: Option<u8>,
        #[serde(default, deserialize_with = "or_default")]
        level: u8,
    }

    fn record(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_number_forgives_bad_input() {
        assert_eq!(record(r#"{"amount": 12.5}"#).amount, 12.5);
        assert_eq!(record(r#"{"amount": " 40 "}"#).amount, 40.0);
        assert_eq!(record(r#"{"amount": "abc"}"#).amount, 0.0);
        assert_eq!(record(r#"{"amount": null}"#).amount, 0.0);
        assert_eq!(record(r#"{"amount": [1]}"#).amount, 0.0);
        assert_eq!(record(r#"{}"#).amount, 0.0);
    }

    #[test]
    fn test_timestamp_accepts_bare_dates() {
        let at = record(r#"{"at": "2026-02-01"}"#).at;
        assert_eq!(at.to_rfc3339(), "2026-02-01T00:00:00+00:00");
        let at = record(r#"{"at": "2026-02-01T09:15:00-03:00"}"#).at;
        assert_eq!(at.to_rfc3339(), "2026-02-01T12:15:00+00:00");
        assert_eq!(record(r#"{"at": ""}"#).at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_optional_drops_unreadable_values() {
        assert_eq!(record(r#"{"tier": 2}"#).tier, Some(2));
        assert_eq!(record(r#"{"tier": ""}"#).tier, None);
        assert_eq!(record(r#"{"tier": null}"#).tier, None);
    }

    #[test]
    fn test_or_default_falls_back() {
        assert_eq!(record(r#"{"level": 4}"#).level, 4);
        assert_eq!(record(r#"{"level": "four"}"#).level, 0);
        assert_eq!(record(r#"{"level": null}"#).level, 0);
    }
}
