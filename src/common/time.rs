//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock returning the given instant
    pub fn new(fixed_time: DateTime<Utc>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.fixed_time
    }
}

/// Format an instant as RFC 3339 with millisecond precision in UTC.
///
/// Matches the `toISOString()` format the original store rows use, so string
/// comparison orders chronologically.
pub fn to_iso8601(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_returns_current_time() {
        // given:
        let clock = SystemClock;

        // when:
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        // then:
        assert!(before <= now);
        assert!(now <= after);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_time() {
        // given:
        let fixed = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let clock = FixedClock::new(fixed);

        // when:
        let first = clock.now();
        let second = clock.now();

        // then:
        assert_eq!(first, fixed);
        assert_eq!(second, fixed);
    }

    #[test]
    fn test_to_iso8601_uses_millisecond_precision_utc() {
        // given:
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();

        // when:
        let formatted = to_iso8601(&instant);

        // then:
        assert_eq!(formatted, "2024-03-01T12:30:05.000Z");
    }

    #[test]
    fn test_to_iso8601_orders_lexicographically() {
        // given:
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 6).unwrap();

        // when:
        let a = to_iso8601(&earlier);
        let b = to_iso8601(&later);

        // then:
        assert!(a < b);
    }
}
