//! Renewal arithmetic.

use std::num::{IntErrorKind, ParseIntError};
use std::time::{SystemTime, UNIX_EPOCH};

use marzban_core::SECS_PER_DAY;

/// Compute the expiry of a subscription renewed by `renewal_days`.
///
/// An absent or zero `current_expire` means the subscription is unlimited,
/// and one strictly before `now` has already lapsed. In both cases the
/// countdown restarts from `now`. Otherwise the renewal is appended to the
/// existing expiry.
///
/// Non-positive `renewal_days` are not rejected here; they shorten the
/// result. The arithmetic saturates instead of overflowing.
pub fn compute_renewal(current_expire: Option<i64>, now: i64, renewal_days: i64) -> i64 {
    let current = current_expire.unwrap_or(0);
    let base = if current == 0 || current < now {
        now
    } else {
        current
    };
    base.saturating_add(renewal_days.saturating_mul(SECS_PER_DAY))
}

/// Parse the `days` query parameter, falling back to `default` when it is
/// absent or not an integer.
///
/// An integer outside the `i64` range is an error rather than a fallback.
pub fn parse_days(raw: Option<&str>, default: i64) -> Result<i64, ParseIntError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(days) => Ok(days),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(e)
        }
        Err(_) => Ok(default),
    }
}

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    i64::try_from(secs).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn unlimited_restarts_from_now() {
        assert_eq!(compute_renewal(Some(0), NOW, 30), 1_702_592_000);
        assert_eq!(compute_renewal(None, NOW, 30), 1_702_592_000);
    }

    #[test]
    fn lapsed_restarts_from_now() {
        for past in [1, NOW - 86_400, NOW - 1] {
            assert_eq!(compute_renewal(Some(past), NOW, 10), NOW + 864_000);
        }
    }

    #[test]
    fn expiring_exactly_now_restarts_from_now() {
        assert_eq!(compute_renewal(Some(NOW), NOW, 1), NOW + 86_400);
    }

    #[test]
    fn active_extends_existing_expiry() {
        for future in [NOW + 1, NOW + 86_400, NOW + 365 * 86_400] {
            assert_eq!(compute_renewal(Some(future), NOW, 7), future + 7 * 86_400);
        }
    }

    #[test]
    fn non_positive_days_shorten_or_noop() {
        assert_eq!(compute_renewal(Some(0), NOW, 0), NOW);
        assert_eq!(compute_renewal(Some(NOW + 10 * 86_400), NOW, -3), NOW + 7 * 86_400);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        assert_eq!(compute_renewal(Some(i64::MAX - 1), NOW, 30), i64::MAX);
        assert_eq!(compute_renewal(Some(0), NOW, i64::MAX), i64::MAX);
    }

    #[test]
    fn parse_days_defaults() {
        assert_eq!(parse_days(None, 30), Ok(30));
        assert_eq!(parse_days(Some(""), 30), Ok(30));
        assert_eq!(parse_days(Some("abc"), 30), Ok(30));
        assert_eq!(parse_days(Some("1.5"), 30), Ok(30));
    }

    #[test]
    fn parse_days_numeric() {
        assert_eq!(parse_days(Some("10"), 30), Ok(10));
        assert_eq!(parse_days(Some(" 7 "), 30), Ok(7));
        assert_eq!(parse_days(Some("-5"), 30), Ok(-5));
    }

    #[test]
    fn parse_days_out_of_range_is_error() {
        let err = parse_days(Some("99999999999999999999"), 30).unwrap_err();
        assert_eq!(err.kind(), &IntErrorKind::PosOverflow);
        let err = parse_days(Some("-99999999999999999999"), 30).unwrap_err();
        assert_eq!(err.kind(), &IntErrorKind::NegOverflow);
    }

    #[test]
    fn unix_now_is_recent() {
        assert!(unix_now() > NOW);
    }
}
