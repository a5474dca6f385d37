//! Formatting utilities for file sizes and countdowns, plus ISO date handling.

use std::time::Duration;

/// Units used by [`format_human_size`], each 1024 times the previous.
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count for display (e.g., "0 B", "1 KB", "1.50 KB").
///
/// Picks the largest base-1024 unit in which the value is at least 1. Whole
/// values print without decimals, everything else with two.
pub fn format_human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }

    if bytes % scale == 0 {
        format!("{} {}", bytes / scale, SIZE_UNITS[unit])
    } else {
        format!("{:.2} {}", bytes as f64 / scale as f64, SIZE_UNITS[unit])
    }
}

// =============================================================================
// Dates
// =============================================================================

const SECS_PER_DAY: i64 = 86_400;

/// Days since 1970-01-01 for a proleptic Gregorian date.
///
/// Counts in 400-year eras starting on March 1st, so the leap day is the
/// last day of each shifted year.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year.rem_euclid(400);
    let shifted_month = i64::from((month + 9) % 12);
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let days = days + 719_468;
    let era = days.div_euclid(146_097);
    let day_of_era = days.rem_euclid(146_097);
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * shifted_month + 2) / 5 + 1) as u32;
    let month = ((shifted_month + 2) % 12 + 1) as u32;
    let year = era * 400 + year_of_era + i64::from(month <= 2);
    (year, month, day)
}

/// Format Unix timestamp (seconds) as ISO date (YYYY-MM-DD).
pub fn format_date_iso(timestamp: u64) -> String {
    let (year, month, day) = civil_from_days(timestamp as i64 / SECS_PER_DAY);
    format!("{year:04}-{month:02}-{day:02}")
}

/// Parse an RFC 3339 timestamp into milliseconds since the Unix epoch.
///
/// Accepts what `Date.prototype.toISOString` writes
/// (`2024-01-01T00:00:00.000Z`), plus a missing fraction and `+HH:MM` /
/// `-HH:MM` offsets. Returns `None` for anything else or for instants
/// before 1970.
pub fn parse_iso_millis(text: &str) -> Option<u64> {
    let (date, time) = text.split_once(['T', 't', ' '])?;

    let mut date_parts = date.splitn(3, '-');
    let year: i64 = date_parts.next()?.parse().ok()?;
    let month: u32 = date_parts.next()?.parse().ok()?;
    let day: u32 = date_parts.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || day == 0 {
        return None;
    }
    let days = days_from_civil(year, month, day);
    // Rejects day 31 in a 30-day month, Feb 29 in common years, etc.
    if civil_from_days(days) != (year, month, day) {
        return None;
    }

    let (clock, offset_secs) = match time.strip_suffix(['Z', 'z']) {
        Some(clock) => (clock, 0),
        None => {
            let split = time.rfind(['+', '-'])?;
            let (clock, offset) = time.split_at(split);
            let sign = if offset.starts_with('-') { -1 } else { 1 };
            let (hours, minutes) = offset[1..].split_once(':')?;
            let hours: i64 = hours.parse().ok()?;
            let minutes: i64 = minutes.parse().ok()?;
            if hours > 23 || minutes > 59 {
                return None;
            }
            (clock, sign * (hours * 3600 + minutes * 60))
        }
    };

    let mut clock_parts = clock.splitn(3, ':');
    let hour: i64 = clock_parts.next()?.parse().ok()?;
    let minute: i64 = clock_parts.next()?.parse().ok()?;
    let seconds_field = clock_parts.next()?;
    let (second, fraction) = seconds_field.split_once('.').unwrap_or((seconds_field, ""));
    let second: i64 = second.parse().ok()?;
    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis: i64 = format!("{fraction:0<3}")[..3].parse().ok()?;

    let secs = days * SECS_PER_DAY + hour * 3600 + minute * 60 + second - offset_secs;
    u64::try_from(secs * 1000 + millis).ok()
}

/// Format the time left on the undo toast, rounded up to whole seconds ("10s").
pub fn format_countdown(remaining: Duration) -> String {
    let millis = remaining.as_millis();
    format!("{}s", millis.div_ceil(1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_human_size() {
        assert_eq!(format_human_size(0), "0 B");
        assert_eq!(format_human_size(1), "1 B");
        assert_eq!(format_human_size(1023), "1023 B");
        assert_eq!(format_human_size(1024), "1 KB");
        assert_eq!(format_human_size(1536), "1.50 KB");
        assert_eq!(format_human_size(1024 * 1024), "1 MB");
        assert_eq!(format_human_size(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_format_human_size_rounds_to_two_places() {
        // 1025 / 1024 = 1.0009..., not whole, so two decimals.
        assert_eq!(format_human_size(1025), "1.00 KB");
        assert_eq!(format_human_size(2047), "2.00 KB");
    }

    #[test]
    fn test_format_human_size_caps_at_terabytes() {
        let tb = 1024u64.pow(4);
        assert_eq!(format_human_size(tb), "1 TB");
        assert_eq!(format_human_size(2048 * tb), "2048 TB");
    }

    #[test]
    fn test_format_date_iso() {
        assert_eq!(format_date_iso(0), "1970-01-01");
        // 2024-01-01 00:00:00 UTC = 1704067200
        assert_eq!(format_date_iso(1704067200), "2024-01-01");
        // 2024-02-29 12:00:00 UTC
        assert_eq!(format_date_iso(1709208000), "2024-02-29");
        // 2100 is not a leap year.
        assert_eq!(format_date_iso(4107542400), "2100-03-01");
    }

    #[test]
    fn test_civil_days_round_trip() {
        for days in [-1, 0, 59, 365, 11_016, 19_723, 47_541, 100_000] {
            let (year, month, day) = civil_from_days(days);
            assert_eq!(days_from_civil(year, month, day), days);
        }
    }

    // =========================================================================
    // ISO Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_iso_millis_browser_format() {
        assert_eq!(
            parse_iso_millis("2024-01-01T00:00:00.000Z"),
            Some(1_704_067_200_000)
        );
        assert_eq!(
            parse_iso_millis("2024-02-29T12:00:00.250Z"),
            Some(1_709_208_000_250)
        );
        assert_eq!(parse_iso_millis("1970-01-01T00:00:00Z"), Some(0));
    }

    #[test]
    fn test_parse_iso_millis_offsets_and_fractions() {
        assert_eq!(
            parse_iso_millis("2024-01-01T02:00:00+02:00"),
            Some(1_704_067_200_000)
        );
        assert_eq!(
            parse_iso_millis("2023-12-31T19:00:00-05:00"),
            Some(1_704_067_200_000)
        );
        assert_eq!(parse_iso_millis("1970-01-01T00:00:00.5Z"), Some(500));
        assert_eq!(parse_iso_millis("1970-01-01T00:00:00.123456Z"), Some(123));
    }

    #[test]
    fn test_parse_iso_millis_rejects_garbage() {
        assert_eq!(parse_iso_millis(""), None);
        assert_eq!(parse_iso_millis("yesterday"), None);
        assert_eq!(parse_iso_millis("2024-01-01"), None);
        assert_eq!(parse_iso_millis("2023-02-29T00:00:00Z"), None);
        assert_eq!(parse_iso_millis("2024-04-31T00:00:00Z"), None);
        assert_eq!(parse_iso_millis("2024-13-01T00:00:00Z"), None);
        assert_eq!(parse_iso_millis("2024-01-01T24:00:00Z"), None);
        assert_eq!(parse_iso_millis("2024-01-01T00:00:00.abcZ"), None);
        assert_eq!(parse_iso_millis("1969-12-31T23:59:59Z"), None);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::from_secs(10)), "10s");
        assert_eq!(format_countdown(Duration::from_millis(9001)), "10s");
        assert_eq!(format_countdown(Duration::from_millis(1)), "1s");
        assert_eq!(format_countdown(Duration::ZERO), "0s");
    }
}
