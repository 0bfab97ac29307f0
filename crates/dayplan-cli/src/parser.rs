use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use chrono_english::{parse_date_string, Dialect};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses a local start time. Exact ISO forms are tried first, then natural
/// language ("tomorrow 9am", "next friday 14:00") relative to `now`.
/// A bare date starts at 09:00.
pub fn parse_due(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let input = input.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(parsed);
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day.and_time(default_start()));
    }
    // The local wall clock is passed off as UTC so no offset is applied.
    parse_date_string(input, now.and_utc(), Dialect::Uk)
        .map(|parsed| parsed.naive_utc())
        .map_err(|e| anyhow!("Failed to parse due date '{}': {}", input, e))
}

/// A day as YYYY-MM-DD, or "today"/"tomorrow"/"yesterday".
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    match input.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid date '{}': expected YYYY-MM-DD", input)),
    }
}

pub fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| anyhow!("Invalid time '{}': expected HH:MM", input))
}

/// YYYY-MM into (year, month).
pub fn parse_month(input: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month '{}': expected YYYY-MM", input))?;
    Ok((first.year(), first.month()))
}

/// Start of the next full hour after `now`; new tasks without a due time land there.
pub fn next_full_hour(now: NaiveDateTime) -> NaiveDateTime {
    let truncated = now
        .date()
        .and_time(NaiveTime::from_hms_opt(now.hour(), 0, 0).unwrap_or(NaiveTime::MIN));
    truncated + Duration::hours(1)
}

fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}
