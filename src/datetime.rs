//! Date and time helpers
//!
//! Rounding of instants to minute steps and the display format shared by
//! every time-slot label.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use std::fmt::Display;

/// Default granularity of time-slot start times, in minutes
pub const MINUTES_STEP: u32 = 5;

/// Display format for slot date/times: weekday followed by a 24h date/time
pub const SLOT_DATETIME_FORMAT: &str = "%a %Y-%m-%d %H:%M";

/// Round an instant up to the next multiple of `minutes_step` minutes since
/// the Unix epoch.
///
/// Instants already on a boundary are returned unchanged. A step of zero
/// leaves the instant as-is.
pub fn round_up_to_step(instant: DateTime<Utc>, minutes_step: u32) -> DateTime<Utc> {
    if minutes_step == 0 {
        return instant;
    }

    let coefficient = i64::from(minutes_step) * 60 * 1000;
    let millis = instant.timestamp_millis();
    let remainder = millis.rem_euclid(coefficient);
    let rounded = if remainder == 0 {
        millis
    } else {
        millis - remainder + coefficient
    };

    DateTime::from_timestamp_millis(rounded).unwrap_or(instant)
}

/// Current time rounded up to the next `minutes_step` boundary
pub fn now_in_minutes_step(minutes_step: u32) -> DateTime<Utc> {
    round_up_to_step(Utc::now(), minutes_step)
}

/// Same time tomorrow
pub fn tomorrow() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}

/// Local midnight at the start of tomorrow
pub fn tomorrow_flat() -> DateTime<Utc> {
    let midnight = (Local::now() + Duration::days(1))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();

    match midnight.and_local_timezone(Local).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Midnight skipped by a DST transition
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// Format a slot date/time in the local timezone
pub fn format_slot_datetime(instant: DateTime<Utc>) -> String {
    format_slot_datetime_in(instant, &Local)
}

/// Format a slot date/time in an explicit timezone
pub fn format_slot_datetime_in<Tz>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant
        .with_timezone(tz)
        .format(SLOT_DATETIME_FORMAT)
        .to_string()
}

/// Serde adapter for slot date/times
///
/// Writes RFC 3339. Reads RFC 3339 or the RFC 2822 style
/// (`"Fri, 19 Jan 2024 18:05:00 GMT"`) some backends emit.
pub mod serde_lenient {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_lenient(&raw).ok_or_else(|| de::Error::custom(format!("invalid date/time: {}", raw)))
    }
}

/// Parse RFC 3339 or RFC 2822 into UTC
pub fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_round_up_mid_interval() {
        let rounded = round_up_to_step(at("2024-01-15T10:31:12Z"), 5);
        assert_eq!(rounded, at("2024-01-15T10:35:00Z"));
    }

    #[test]
    fn test_round_up_on_boundary_is_unchanged() {
        let rounded = round_up_to_step(at("2024-01-15T10:30:00Z"), 5);
        assert_eq!(rounded, at("2024-01-15T10:30:00Z"));
    }

    #[test]
    fn test_round_up_one_millisecond_past() {
        let instant = at("2024-01-15T10:30:00.001Z");
        assert_eq!(round_up_to_step(instant, 5), at("2024-01-15T10:35:00Z"));
    }

    #[test]
    fn test_round_up_crosses_day() {
        let rounded = round_up_to_step(at("2024-01-15T23:58:00Z"), 5);
        assert_eq!(rounded, at("2024-01-16T00:00:00Z"));
    }

    #[test]
    fn test_zero_step() {
        let instant = at("2024-01-15T10:31:12Z");
        assert_eq!(round_up_to_step(instant, 0), instant);
    }

    #[test]
    fn test_now_in_minutes_step_is_future_boundary() {
        let before = Utc::now();
        let rounded = now_in_minutes_step(MINUTES_STEP);
        assert!(rounded >= before - Duration::milliseconds(1));
        assert_eq!(rounded.timestamp_millis() % (5 * 60 * 1000), 0);
    }

    #[test]
    fn test_tomorrow_flat_is_after_now() {
        let flat = tomorrow_flat();
        assert!(flat > Utc::now());
        assert!(flat <= tomorrow());
    }

    #[test]
    fn test_parse_lenient_formats() {
        let expected = at("2024-01-19T18:05:00Z");
        assert_eq!(parse_lenient("2024-01-19T18:05:00Z"), Some(expected));
        assert_eq!(parse_lenient("2024-01-19T13:05:00-05:00"), Some(expected));
        assert_eq!(parse_lenient("Fri, 19 Jan 2024 18:05:00 GMT"), Some(expected));
        assert_eq!(parse_lenient("next friday"), None);
    }

    #[test]
    fn test_format_in_utc() {
        let formatted = format_slot_datetime_in(at("2024-01-19T18:05:00Z"), &Utc);
        assert_eq!(formatted, "Fri 2024-01-19 18:05");
    }
}
