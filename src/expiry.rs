//! Remaining-validity calculation for directory credentials.
//!
//! Secrets and certificates are measured differently:
//!
//! - a secret reports the whole days left until its end date, counted
//!   from the scrape time;
//! - a certificate reports its total validity span (end minus start),
//!   independent of the scrape time.
//!
//! Both round a partial day up, so a credential with any time left is
//! never reported as zero.

use chrono::{DateTime, Duration, Utc};

/// Remaining validity of a single credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Credential still valid for this many whole days (rounded up).
    Remaining(u64),
    /// Credential end date is already in the past.
    Expired,
}

impl Expiry {
    /// Metric value for this credential, floored at zero.
    pub fn days(&self) -> u64 {
        match self {
            Self::Remaining(days) => *days,
            Self::Expired => 0,
        }
    }

    /// Returns true if the credential has expired.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Days left on a secret at `now`.
///
/// A secret whose end equals `now` exactly is not yet expired and
/// reports zero days.
pub fn secret_days_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> Expiry {
    if now > end {
        return Expiry::Expired;
    }
    Expiry::Remaining(ceil_days(end - now))
}

/// Total validity span of a certificate, in days.
///
/// Not relative to the scrape time. An inverted range yields zero.
pub fn certificate_validity_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    if start > end {
        return 0;
    }
    ceil_days(end - start)
}

fn ceil_days(span: Duration) -> u64 {
    let whole = span.num_days();
    let days = if span > Duration::days(whole) { whole + 1 } else { whole };
    days.max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_secret_ten_days() {
        let expiry = secret_days_remaining(now() + Duration::days(10), now());
        assert_eq!(expiry, Expiry::Remaining(10));
        assert!(!expiry.is_expired());
    }

    #[test]
    fn test_secret_partial_day_rounds_up() {
        let expiry = secret_days_remaining(now() + Duration::hours(1), now());
        assert_eq!(expiry.days(), 1);

        let expiry = secret_days_remaining(now() + Duration::days(3) + Duration::seconds(1), now());
        assert_eq!(expiry.days(), 4);
    }

    #[test]
    fn test_secret_expired() {
        let expiry = secret_days_remaining(now() - Duration::days(2), now());
        assert_eq!(expiry, Expiry::Expired);
        assert_eq!(expiry.days(), 0);
    }

    #[test]
    fn test_secret_ending_now() {
        let expiry = secret_days_remaining(now(), now());
        assert_eq!(expiry, Expiry::Remaining(0));
    }

    #[test]
    fn test_certificate_full_year() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(365);
        assert_eq!(certificate_validity_days(start, end), 365);
    }

    #[test]
    fn test_certificate_ignores_now() {
        // Span is reported even for a certificate that ended long ago.
        let start = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(30);
        assert_eq!(certificate_validity_days(start, end), 30);
    }

    #[test]
    fn test_certificate_inverted_range() {
        let start = now();
        assert_eq!(certificate_validity_days(start, start - Duration::days(1)), 0);
    }

    proptest! {
        #[test]
        fn prop_future_secret_at_least_one_day(secs in 1i64..(3650 * 86_400)) {
            let expiry = secret_days_remaining(now() + Duration::seconds(secs), now());
            prop_assert!(expiry.days() >= 1);
            prop_assert!(!expiry.is_expired());
        }

        #[test]
        fn prop_past_secret_is_zero(secs in 1i64..(3650 * 86_400)) {
            let expiry = secret_days_remaining(now() - Duration::seconds(secs), now());
            prop_assert_eq!(expiry, Expiry::Expired);
            prop_assert_eq!(expiry.days(), 0);
        }

        #[test]
        fn prop_certificate_span_is_ceiling(secs in 0i64..(3650 * 86_400)) {
            let start = now();
            let days = certificate_validity_days(start, start + Duration::seconds(secs));
            let expected = (secs + 86_399) / 86_400;
            prop_assert_eq!(days, expected as u64);
        }
    }
}
