//! Calendar month arithmetic.

use time::{Date, Month, OffsetDateTime};

/// Advance `at` by `months` calendar months.
///
/// Seconds and sub-second precision are zeroed first. Month overflow rolls
/// into the following years. When the target month is shorter than the
/// starting day-of-month, the day is clamped to the target month's last day
/// (Jan 31 + 1 month = Feb 28, or Feb 29 in a leap year).
///
/// Returns `None` when the result falls outside the supported date range.
pub fn add_months(at: OffsetDateTime, months: u32) -> Option<OffsetDateTime> {
    let at = at.replace_second(0).ok()?.replace_nanosecond(0).ok()?;

    let index = i64::from(u8::from(at.month())) - 1 + i64::from(months);
    let year = i32::try_from(i64::from(at.year()) + index.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;

    let mut day = at.day();
    let date = loop {
        match Date::from_calendar_date(year, month, day) {
            Ok(date) => break date,
            Err(_) if day > 28 => day -= 1,
            Err(_) => return None,
        }
    };

    Some(at.replace_date(date))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn one_month_from_february_first() {
        let start = datetime!(2025-02-01 10:15:42.5 UTC);
        assert_eq!(add_months(start, 1), Some(datetime!(2025-03-01 10:15:00 UTC)));
        // Calendar semantics, not 30 days: Feb 1 + 30 days is Mar 3.
        assert_ne!(
            add_months(start, 1).map(|t| t.unix_timestamp()),
            Some(datetime!(2025-02-01 10:15:00 UTC).unix_timestamp() + 30 * 86_400)
        );
    }

    #[test]
    fn rolls_into_following_years() {
        let start = datetime!(2024-11-15 08:00:59 UTC);
        assert_eq!(add_months(start, 2), Some(datetime!(2025-01-15 08:00:00 UTC)));
        assert_eq!(add_months(start, 26), Some(datetime!(2027-01-15 08:00:00 UTC)));
    }

    #[test]
    fn clamps_to_last_day_of_month() {
        assert_eq!(
            add_months(datetime!(2025-01-31 12:00 UTC), 1),
            Some(datetime!(2025-02-28 12:00 UTC))
        );
        assert_eq!(
            add_months(datetime!(2024-01-31 12:00 UTC), 1),
            Some(datetime!(2024-02-29 12:00 UTC))
        );
        assert_eq!(
            add_months(datetime!(2025-03-31 12:00 UTC), 1),
            Some(datetime!(2025-04-30 12:00 UTC))
        );
    }

    #[test]
    fn zero_months_only_truncates() {
        assert_eq!(
            add_months(datetime!(2025-06-10 23:59:59.999 UTC), 0),
            Some(datetime!(2025-06-10 23:59:00 UTC))
        );
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(add_months(datetime!(2025-01-01 0:00 UTC), u32::MAX), None);
    }
}
