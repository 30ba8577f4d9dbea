use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::constants::DAYS_PER_YEAR;

/// Default timezone for reference dates.
/// "Today" for a period request is the calendar date in this timezone.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a valuation date in the given timezone.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default valuation timezone.
/// Only request handling calls this; the engine itself never reads the clock.
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now(), DEFAULT_VALUATION_TZ)
}

/// Length of `[start, end]` in years of 365.25 days. Zero or negative when
/// `end <= start`.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from((end - start).num_days()) / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_fraction_uses_365_25() {
        assert_eq!(
            year_fraction(date(2023, 1, 1), date(2024, 1, 1)),
            dec!(365) / dec!(365.25)
        );
        assert_eq!(year_fraction(date(2024, 1, 1), date(2024, 1, 1)), dec!(0));
    }

    #[test]
    fn test_valuation_date_from_utc_shifts_to_local_day() {
        let instant = DateTime::parse_from_rfc3339("2024-03-01T03:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            valuation_date_from_utc(instant, DEFAULT_VALUATION_TZ),
            date(2024, 2, 29)
        );
    }
}
