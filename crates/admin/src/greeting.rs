//! Dashboard greeting by local time of day.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Greeting for an hour of the day (0-23).
#[must_use]
pub const fn greeting(hour: u32) -> &'static str {
    match hour {
        4..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        17..=23 => "Good Evening",
        _ => "It is very late",
    }
}

/// Greeting for `now` as seen in `tz`.
#[must_use]
pub fn greeting_at(now: DateTime<Utc>, tz: Tz) -> &'static str {
    greeting(tz.from_utc_datetime(&now.naive_utc()).hour())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting(3), "It is very late");
        assert_eq!(greeting(4), "Good Morning");
        assert_eq!(greeting(11), "Good Morning");
        assert_eq!(greeting(12), "Good Afternoon");
        assert_eq!(greeting(16), "Good Afternoon");
        assert_eq!(greeting(17), "Good Evening");
        assert_eq!(greeting(23), "Good Evening");
        assert_eq!(greeting(0), "It is very late");
    }

    #[test]
    fn test_greeting_uses_timezone() {
        // 15:00 UTC in July is 10:00 in Chicago
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap();
        assert_eq!(greeting_at(now, chrono_tz::America::Chicago), "Good Morning");
        assert_eq!(greeting_at(now, chrono_tz::UTC), "Good Afternoon");
    }
}
