//! Parsing and serde support for backtester timestamps.
//!
//! Exports write minute-resolution local times such as `2021-05-19 08:00`.
//! They are kept as `NaiveDateTime`; no timezone is implied.

use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses a backtester timestamp. A bare date is read as midnight.
pub fn parse(raw: &str) -> Result<NaiveDateTime, CoreError> {
    let value = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CoreError::InvalidDatetime(raw.to_string()))
}

/// Formats a timestamp the way the exports do, keeping seconds only when set.
pub fn format(datetime: &NaiveDateTime) -> String {
    if datetime.second() == 0 {
        datetime.format("%Y-%m-%d %H:%M").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

pub fn serialize<S>(datetime: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(datetime))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_every_export_layout() {
        let minute = parse("2020-03-12 04:00").unwrap();
        assert_eq!(minute.year(), 2020);
        assert_eq!(minute.hour(), 4);

        assert_eq!(parse("2020-03-12 04:00:30").unwrap().second(), 30);
        assert_eq!(parse("2020-03-12T04:00:00").unwrap(), minute);
        assert_eq!(parse("2020-03-12").unwrap().hour(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse("12/03/2020"),
            Err(CoreError::InvalidDatetime("12/03/2020".to_string()))
        );
        assert!(parse("").is_err());
    }

    #[test]
    fn formats_without_zero_seconds() {
        assert_eq!(format(&parse("2020-03-12 04:00").unwrap()), "2020-03-12 04:00");
        assert_eq!(
            format(&parse("2020-03-12 04:00:07").unwrap()),
            "2020-03-12 04:00:07"
        );
    }
}
