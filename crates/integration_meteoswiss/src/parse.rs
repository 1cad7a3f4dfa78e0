//! Best-effort value parsing
//!
//! Every helper here returns `None` instead of failing. Mappers rely on this:
//! a single malformed field becomes an absent value and never aborts the
//! record it belongs to.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Parse a float, `None` on absent or malformed input
#[must_use]
pub fn parse_float(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
}

/// Parse an integer, `None` on absent or malformed input
#[must_use]
pub fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Interpret a JSON scalar as a float
///
/// Numbers are taken as-is, numeric strings are parsed. Anything else,
/// including `null`, is absent.
pub(crate) fn json_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(Some(s.as_str())),
        _ => None,
    }
}

/// Interpret a JSON scalar as an integer
///
/// Floats without a fractional part (`1.0`, `1718409600000.0`) count as
/// integers.
pub(crate) fn json_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => parse_int(Some(s.as_str())),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral_f64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or past it overflows i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then(|| f as i64)
}

/// Interpret a JSON scalar as an icon code
pub(crate) fn json_icon(value: Option<&Value>) -> Option<i32> {
    json_i64(value).and_then(|code| i32::try_from(code).ok())
}

/// Convert a UTC epoch in milliseconds to a timestamp
pub(crate) fn epoch_millis(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(DateTime::from_timestamp_millis)
}

/// Parse a naive date-time with `format` and pin it to UTC
pub(crate) fn utc_datetime(raw: Option<&str>, format: &str) -> Option<DateTime<Utc>> {
    let dt = NaiveDateTime::parse_from_str(raw?.trim(), format).ok()?;
    Some(Utc.from_utc_datetime(&dt))
}

/// Parse a `YYYY-MM-DD` day into midnight UTC
pub(crate) fn utc_day(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(Some("24.8")), Some(24.8));
        assert_eq!(parse_float(Some("-3")), Some(-3.0));
        assert_eq!(parse_float(Some(" 1.32 ")), Some(1.32));
        assert_eq!(parse_float(Some("N/A")), None);
        assert_eq!(parse_float(Some("")), None);
        assert_eq!(parse_float(Some("-")), None);
        assert_eq!(parse_float(None), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(Some("10")), Some(10));
        assert_eq!(parse_int(Some("-7")), Some(-7));
        assert_eq!(parse_int(Some("10.5")), None);
        assert_eq!(parse_int(Some("abc")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn test_json_scalars() {
        let doc = json!({"a": 1.5, "b": "2.5", "c": null, "d": [1], "e": 7, "f": "8"});
        assert_eq!(json_f64(doc.get("a")), Some(1.5));
        assert_eq!(json_f64(doc.get("b")), Some(2.5));
        assert_eq!(json_f64(doc.get("c")), None);
        assert_eq!(json_f64(doc.get("d")), None);
        assert_eq!(json_f64(doc.get("missing")), None);
        assert_eq!(json_i64(doc.get("e")), Some(7));
        assert_eq!(json_i64(doc.get("f")), Some(8));
        assert_eq!(json_i64(doc.get("a")), None);
        assert_eq!(json_icon(doc.get("e")), Some(7));
    }

    #[test]
    fn test_json_integral_floats() {
        let doc = json!({"start": 1_718_409_600_000.0, "icon": 1.0, "half": 2.5, "huge": 1e300});
        assert_eq!(json_i64(doc.get("start")), Some(1_718_409_600_000));
        assert_eq!(json_icon(doc.get("icon")), Some(1));
        assert_eq!(json_i64(doc.get("half")), None);
        assert_eq!(json_i64(doc.get("huge")), None);
    }

    #[test]
    fn test_json_icon_out_of_range() {
        let doc = json!({"icon": 9_999_999_999_i64});
        assert_eq!(json_icon(doc.get("icon")), None);
    }

    #[test]
    fn test_epoch_millis() {
        let ts = epoch_millis(Some(1_700_000_000_000)).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(epoch_millis(None), None);
    }

    #[test]
    fn test_utc_datetime() {
        let ts = utc_datetime(Some("202406151230"), "%Y%m%d%H%M").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 6);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 30);

        assert!(utc_datetime(Some("2024-06-15"), "%Y%m%d%H%M").is_none());
        assert!(utc_datetime(None, "%Y%m%d%H%M").is_none());
    }

    #[test]
    fn test_utc_day() {
        let ts = utc_day(Some("2024-06-15")).unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2024-06-15 00:00");
        assert!(utc_day(Some("15.06.2024")).is_none());
    }
}
