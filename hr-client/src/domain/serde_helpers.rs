//! Lenient (de)serializers for the shapes the HR API actually emits.
//!
//! DATE columns come back either as `2024-03-01` or as a full timestamp
//! (`2024-03-01T00:00:00.000Z`), and money/day columns are sometimes JSON
//! strings (`"1250.00"`) instead of numbers.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parse a calendar date, tolerating a trailing time component.
pub fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
    let day_part = raw.split('T').next().unwrap_or(raw);
    Date::parse(day_part.trim(), DATE_FORMAT)
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| format!("{:04}-{:02}-{:02}", date.year(), date.month() as u8, date.day()))
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .or_else(|| parse_date(raw).ok().map(|d| d.midnight().assume_utc()))
}

pub mod date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(de::Error::custom)
    }
}

pub mod timestamp_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value.and_then(|v| v.format(&Rfc3339).ok()) {
            Some(s) => serializer.serialize_some(&s),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Accept `12.5` as well as `"12.5"`.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(de::Error::custom),
    }
}

pub fn lenient_f64_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().map(Some).map_err(de::Error::custom),
    }
}

/// Counts from SQL aggregates may arrive as `"12"`.
pub fn lenient_count_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(lenient_f64_opt(deserializer)?.map(|n| n.max(0.0) as u64))
}

/// MySQL-backed APIs send booleans as `0`/`1`.
pub fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Option::<BoolLike>::deserialize(deserializer)? {
        None => Ok(false),
        Some(BoolLike::Bool(b)) => Ok(b),
        Some(BoolLike::Int(i)) => Ok(i != 0),
        Some(BoolLike::Text(s)) => Ok(matches!(s.as_str(), "true" | "1")),
    }
}

/// Render a day count the way people write it: `3`, `0.5`, `1.5`.
pub fn format_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{}", days as i64)
    } else {
        let rendered = format!("{:.2}", days);
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
