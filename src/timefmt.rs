//! Decimal-hour and timestamp helpers
//!
//! Hours are decimal 24h clock values (`6.5` is 6:30). All formatting
//! functions are total; malformed text only fails in the `parse_*` helpers.

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::TimeError;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Split a decimal hour into its integer hour and rounded minute.
///
/// The minute is not carried: `7.999` gives `(7, 60)`.
fn split_hour(hour: f64) -> (i64, i64) {
    let h = hour.floor();
    let m = ((hour - h) * 60.0).round();
    (h as i64, m as i64)
}

fn twelve_hour(h: i64) -> i64 {
    match h % 12 {
        0 => 12,
        other => other,
    }
}

/// Format a decimal hour as a 12-hour clock string, e.g. `6.5` -> `6:30 AM`.
///
/// Hours 0 and 12 display as 12. A fraction that rounds up to a full hour
/// yields `:60` rather than rolling into the next hour.
pub fn hour_to_clock_string(hour: f64) -> String {
    if !hour.is_finite() {
        return "--:--".to_string();
    }

    let (h, m) = split_hour(hour);
    let period = if h >= 12 { "PM" } else { "AM" };
    format!("{}:{:02} {}", twelve_hour(h), m, period)
}

/// Compact chart tick label: `6am`, `12pm`, `3:30pm`
pub fn hour_to_short_label(hour: f64) -> String {
    if !hour.is_finite() {
        return "--".to_string();
    }

    let (h, m) = split_hour(hour);
    let suffix = if h >= 12 { "pm" } else { "am" };
    if m == 0 {
        format!("{}{}", twelve_hour(h), suffix)
    } else {
        format!("{}:{:02}{}", twelve_hour(h), m, suffix)
    }
}

/// 24-hour `H:MM` label used for event markers
pub fn hour_to_24h_string(hour: f64) -> String {
    if !hour.is_finite() {
        return "--:--".to_string();
    }

    let (h, m) = split_hour(hour);
    format!("{}:{:02}", h, m)
}

/// Decimal hour of day of a timestamp (seconds are ignored)
pub fn hour_of_day<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> f64 {
    timestamp.hour() as f64 + timestamp.minute() as f64 / 60.0
}

/// Signed hours from `earlier` to `later`; `None` when `earlier` is absent.
///
/// Negative results mean `earlier` is actually in the future.
pub fn elapsed_hours_between(
    later: &DateTime<Utc>,
    earlier: Option<&DateTime<Utc>>,
) -> Option<f64> {
    earlier.map(|e| (*later - *e).num_milliseconds() as f64 / MILLIS_PER_HOUR)
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one taken as UTC
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimeError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| TimeError::InvalidTimestamp {
            input: input.to_string(),
        })
}

/// Parse a decimal hour (`6.5`) or a clock time (`06:30`, `24:00`)
pub fn parse_hour(input: &str) -> Result<f64, TimeError> {
    let trimmed = input.trim();
    let invalid = || TimeError::InvalidHour {
        input: input.to_string(),
    };

    if let Some((h, m)) = trimmed.split_once(':') {
        let hours: u32 = h.parse().map_err(|_| invalid())?;
        let minutes: u32 = m.parse().map_err(|_| invalid())?;
        if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
            return Err(invalid());
        }
        return Ok(hours as f64 + minutes as f64 / 60.0);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_string() {
        assert_eq!(hour_to_clock_string(6.5), "6:30 AM");
        assert_eq!(hour_to_clock_string(0.0), "12:00 AM");
        assert_eq!(hour_to_clock_string(12.0), "12:00 PM");
        assert_eq!(hour_to_clock_string(13.25), "1:15 PM");
        assert_eq!(hour_to_clock_string(9.05), "9:03 AM");
        assert_eq!(hour_to_clock_string(f64::NAN), "--:--");
    }

    #[test]
    fn test_clock_string_minute_overflow_is_not_carried() {
        assert_eq!(hour_to_clock_string(7.999), "7:60 AM");
    }

    #[test]
    fn test_short_labels() {
        assert_eq!(hour_to_short_label(0.0), "12am");
        assert_eq!(hour_to_short_label(6.0), "6am");
        assert_eq!(hour_to_short_label(12.0), "12pm");
        assert_eq!(hour_to_short_label(21.0), "9pm");
        assert_eq!(hour_to_short_label(15.5), "3:30pm");
    }

    #[test]
    fn test_24h_string() {
        assert_eq!(hour_to_24h_string(7.25), "7:15");
        assert_eq!(hour_to_24h_string(6.5), "6:30");
        assert_eq!(hour_to_24h_string(18.0), "18:00");
    }

    #[test]
    fn test_elapsed_hours() {
        let now = parse_timestamp("2025-11-09T09:15:00Z").unwrap();
        let run = parse_timestamp("2025-11-09T07:30:00Z").unwrap();

        assert_eq!(elapsed_hours_between(&now, Some(&run)), Some(1.75));
        assert_eq!(elapsed_hours_between(&run, Some(&now)), Some(-1.75));
        assert_eq!(elapsed_hours_between(&now, None), None);
    }

    #[test]
    fn test_hour_of_day() {
        let ts = parse_timestamp("2025-11-09T07:15:42Z").unwrap();
        assert_eq!(hour_of_day(&ts), 7.25);
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2025-11-09T09:15:30").is_ok());
        assert!(parse_timestamp("2025-11-09T09:15:00+02:00").is_ok());
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(TimeError::InvalidTimestamp {
                input: "yesterday".to_string()
            })
        );
    }

    #[test]
    fn test_parse_hour() {
        assert_eq!(parse_hour("6.5").unwrap(), 6.5);
        assert_eq!(parse_hour("06:30").unwrap(), 6.5);
        assert_eq!(parse_hour("24:00").unwrap(), 24.0);
        assert!(parse_hour("24:30").is_err());
        assert!(parse_hour("7:75").is_err());
        assert!(parse_hour("inf").is_err());
        assert!(parse_hour("").is_err());
    }
}
