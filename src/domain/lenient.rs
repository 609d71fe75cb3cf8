//! Lenient timestamp and scalar decoding for stored records.
//!
//! Older records carry ISO strings with or without offsets, `datetime-local`
//! values without seconds, empty strings for "unset", and booleans or numbers
//! encoded as text. These helpers normalise all of that once, at
//! deserialisation time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub mod timestamp {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp `{}`", raw)))
    }
}

pub mod optional_timestamp {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_timestamp(value)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{}`", value))),
        }
    }
}

/// Accepts `true`/`false` as well as the `"yes"`/`"no"` strings form selects produce.
pub mod flag {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrText {
        Bool(bool),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<BoolOrText>::deserialize(deserializer)? {
            None => Ok(false),
            Some(BoolOrText::Bool(value)) => Ok(value),
            Some(BoolOrText::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "on" => Ok(true),
                "no" | "false" | "off" | "" => Ok(false),
                other => Err(de::Error::custom(format!("invalid flag `{}`", other))),
            },
        }
    }
}

/// Accepts a number, a numeric string, or an empty string for "unset".
pub mod count {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u32),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => Ok(Some(value)),
            Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(NumberOrText::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid count `{}`", text))),
        }
    }
}

/// Empty strings become `None`.
pub mod text {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.filter(|value| !value.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn parses_the_shapes_found_in_stored_records() {
        let zulu = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(zulu, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());

        let millis = parse_timestamp("2024-01-15T10:30:00.123Z").unwrap();
        assert_eq!(millis.minute(), 30);

        let local = parse_timestamp("2024-02-15T09:00").unwrap();
        assert_eq!(local, Utc.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap());

        let date = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("next tuesday").is_none());
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
        when: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "flag::deserialize")]
        enabled: bool,
        #[serde(default, deserialize_with = "count::deserialize")]
        limit: Option<u32>,
    }

    #[test]
    fn empty_strings_mean_unset() {
        let probe: Probe = serde_json::from_str(r#"{"when":"","enabled":"no","limit":""}"#).unwrap();
        assert!(probe.when.is_none());
        assert!(!probe.enabled);
        assert!(probe.limit.is_none());
    }

    #[test]
    fn text_encoded_scalars_are_decoded() {
        let probe: Probe = serde_json::from_str(r#"{"enabled":"yes","limit":"40"}"#).unwrap();
        assert!(probe.enabled);
        assert_eq!(probe.limit, Some(40));

        let probe: Probe = serde_json::from_str(r#"{"enabled":true,"limit":12}"#).unwrap();
        assert!(probe.enabled);
        assert_eq!(probe.limit, Some(12));
    }
}
