use crate::error::CoreError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Parse an IANA timezone name
pub fn parse_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone).map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))
}

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<(), CoreError> {
    parse_timezone(timezone).map(|_| ())
}

/// Resolve a local wall-clock time to an absolute instant.
///
/// Ambiguous times (DST fall back) take the earliest instant; times that do not
/// exist (DST spring forward) are moved one hour later.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            let shifted = local + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| tz.from_utc_datetime(&local).with_timezone(&Utc))
        }
    }
}

/// Wall-clock time in `tz` at the instant `now`
pub fn to_local(now: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    now.with_timezone(&tz).naive_local()
}

/// Calendar day in `tz` at the instant `now`
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    to_local(now, tz).date()
}

/// Zone abbreviation in effect at `at` (e.g. "CET" or "CEST")
pub fn zone_abbreviation(tz: Tz, at: DateTime<Utc>) -> String {
    at.with_timezone(&tz).format("%Z").to_string()
}
