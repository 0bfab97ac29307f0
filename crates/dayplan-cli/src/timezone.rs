use dayplan_core::timezone::validate_timezone;

/// Detect system timezone
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

pub fn get_common_timezones() -> Vec<&'static str> {
    vec![
        "UTC",
        "America/New_York",
        "America/Chicago",
        "America/Denver",
        "America/Los_Angeles",
        "America/Sao_Paulo",
        "Europe/London",
        "Europe/Paris",
        "Europe/Berlin",
        "Europe/Madrid",
        "Asia/Tokyo",
        "Asia/Shanghai",
        "Asia/Kolkata",
        "Asia/Dubai",
        "Australia/Sydney",
        "Pacific/Auckland",
    ]
}

/// Common zones whose name shares a part with `invalid`, at most five.
pub fn suggest_timezone(invalid: &str) -> Vec<&'static str> {
    let needle = invalid.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut matches: Vec<_> = get_common_timezones()
        .into_iter()
        .filter(|tz| {
            let lower = tz.to_lowercase();
            lower.contains(&needle)
                || tz
                    .split('/')
                    .any(|part| needle.contains(&part.to_lowercase()))
        })
        .collect();
    matches.truncate(5);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("berlin", vec!["Europe/Berlin"])]
    #[case("Europe/Berln", vec!["Europe/London", "Europe/Paris", "Europe/Berlin", "Europe/Madrid"])]
    #[case("tokio", vec![])]
    #[case("", vec![])]
    fn test_suggest_timezone(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(suggest_timezone(input), expected);
    }

    #[test]
    fn test_common_timezones_are_valid() {
        for tz in get_common_timezones() {
            assert!(validate_timezone(tz).is_ok(), "{}", tz);
        }
    }
}
