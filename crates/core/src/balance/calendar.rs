//! Business-date arithmetic.
//!
//! Timestamps are stored in UTC but every "as of date D" rule is evaluated on
//! the local date in the business time zone. `end_of_day_utc(D)` is the first
//! instant whose local date is after `D`, so `date_of(ts) <= D` holds exactly
//! when `ts < end_of_day_utc(D)`. Storage queries rely on that equivalence.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Converts between UTC instants and business dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    tz: Tz,
}

impl BusinessCalendar {
    /// Creates a calendar for the given zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Returns the calendar's time zone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local business date of an instant.
    #[must_use]
    pub fn date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.tz).date_naive()
    }

    /// Current business date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    /// First instant of `date` in the business zone.
    #[must_use]
    pub fn start_of_day_utc(&self, date: NaiveDate) -> DateTime<Utc> {
        // Local midnight can fall inside a DST gap; take the first hour that exists.
        (0..24)
            .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
            .find_map(|naive| self.tz.from_local_datetime(&naive).earliest())
            .map_or_else(
                || date.and_time(chrono::NaiveTime::MIN).and_utc(),
                |local| local.with_timezone(&Utc),
            )
    }

    /// First instant after `date` in the business zone (exclusive upper bound).
    #[must_use]
    pub fn end_of_day_utc(&self, date: NaiveDate) -> DateTime<Utc> {
        date.succ_opt()
            .map_or(DateTime::<Utc>::MAX_UTC, |next| self.start_of_day_utc(next))
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::new(chrono_tz::America::Sao_Paulo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_of_uses_local_zone() {
        let cal = BusinessCalendar::default();
        // 02:59 UTC is still the previous evening in Sao Paulo (UTC-3).
        let ts = Utc.with_ymd_and_hms(2026, 1, 16, 2, 59, 0).unwrap();
        assert_eq!(cal.date_of(ts), date(2026, 1, 15));
        let ts = Utc.with_ymd_and_hms(2026, 1, 16, 3, 0, 0).unwrap();
        assert_eq!(cal.date_of(ts), date(2026, 1, 16));
    }

    #[test]
    fn test_end_of_day_is_next_local_midnight() {
        let cal = BusinessCalendar::default();
        assert_eq!(
            cal.end_of_day_utc(date(2026, 1, 15)),
            Utc.with_ymd_and_hms(2026, 1, 16, 3, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_end_of_day_bounds_the_local_date() {
        let cal = BusinessCalendar::default();
        let d = date(2026, 3, 10);
        let eod = cal.end_of_day_utc(d);
        assert_eq!(cal.date_of(eod - Duration::seconds(1)), d);
        assert_eq!(cal.date_of(eod), date(2026, 3, 11));
    }

    #[test]
    fn test_start_of_day_inside_dst_gap() {
        let cal = BusinessCalendar::default();
        // Brazil skipped 00:00-01:00 local on 2018-11-04.
        let start = cal.start_of_day_utc(date(2018, 11, 4));
        assert_eq!(cal.date_of(start), date(2018, 11, 4));
        assert_eq!(cal.date_of(start - Duration::seconds(1)), date(2018, 11, 3));
    }

    #[test]
    fn test_utc_calendar() {
        let cal = BusinessCalendar::new(chrono_tz::UTC);
        assert_eq!(
            cal.end_of_day_utc(date(2026, 1, 15)),
            Utc.with_ymd_and_hms(2026, 1, 16, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_end_of_day_at_max_date() {
        let cal = BusinessCalendar::default();
        assert_eq!(cal.end_of_day_utc(NaiveDate::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
