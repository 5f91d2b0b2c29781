//! crates/club_dashboard_core/src/period.rs
//!
//! Turns a leaderboard scope and the current instant into the query
//! parameters the backend expects.

use crate::domain::{PeriodQuery, Scope};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Resolves the period parameters for `scope` relative to `now`.
///
/// Month and Year use the calendar date of `now` in UTC. Week uses the
/// ISO-8601 week number together with its ISO week-year, which differs from
/// the calendar year for the first and last few days of some years.
pub fn resolve(scope: Scope, now: DateTime<Utc>) -> PeriodQuery {
    let today = now.date_naive();
    match scope {
        Scope::Month => PeriodQuery {
            scope,
            year: today.year(),
            month: Some(today.month()),
            iso_week: None,
        },
        Scope::Year => PeriodQuery {
            scope,
            year: today.year(),
            month: None,
            iso_week: None,
        },
        Scope::Week => {
            let (year, week) = iso_week(today);
            PeriodQuery {
                scope,
                year,
                month: None,
                iso_week: Some(week),
            }
        }
    }
}

/// Returns `(iso_week_year, iso_week)` for a calendar date.
///
/// The date is moved to the Thursday of its Monday-based week; that
/// Thursday's year is the week-year and its day-of-year fixes the week.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let weekday = i64::from(date.weekday().number_from_monday());
    let thursday = date
        .checked_add_signed(Duration::days(4 - weekday))
        .unwrap_or(date);
    let days_since_jan1 = thursday.ordinal0();
    let week = (days_since_jan1 + 1).div_ceil(7);
    (thursday.year(), week)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap()
    }

    #[test]
    fn monday_first_of_january_is_week_one() {
        let q = resolve(Scope::Week, at(2024, 1, 1));
        assert_eq!(q.year, 2024);
        assert_eq!(q.iso_week, Some(1));
        assert_eq!(q.month, None);
    }

    #[test]
    fn sunday_new_years_eve_stays_in_week_52() {
        let q = resolve(Scope::Week, at(2023, 12, 31));
        assert_eq!(q.year, 2023);
        assert_eq!(q.iso_week, Some(52));
    }

    #[test]
    fn early_january_can_belong_to_previous_week_year() {
        // 2021-01-03 is a Sunday in week 53 of 2020.
        assert_eq!(iso_week(NaiveDate::from_ymd_opt(2021, 1, 3).unwrap()), (2020, 53));
    }

    #[test]
    fn late_december_can_belong_to_next_week_year() {
        // 2024-12-30 is the Monday of week 1 of 2025.
        assert_eq!(iso_week(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()), (2025, 1));
    }

    #[test]
    fn agrees_with_chrono_for_every_day_of_a_decade() {
        let mut day = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();
        while day < end {
            let (year, week) = iso_week(day);
            let expected = day.iso_week();
            assert_eq!((year, week), (expected.year(), expected.week()), "{}", day);
            assert!((1..=53).contains(&week));
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn month_and_year_use_calendar_fields() {
        let month = resolve(Scope::Month, at(2023, 12, 31));
        assert_eq!((month.year, month.month, month.iso_week), (2023, Some(12), None));

        let year = resolve(Scope::Year, at(2021, 1, 3));
        assert_eq!((year.year, year.month, year.iso_week), (2021, None, None));
    }

    #[test]
    fn query_pairs_follow_scope() {
        let pairs = resolve(Scope::Week, at(2024, 1, 1)).query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("scope", "week".to_string()),
                ("year", "2024".to_string()),
                ("week", "1".to_string()),
            ]
        );
        let keys: Vec<_> = resolve(Scope::Year, at(2024, 6, 1))
            .query_pairs()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["scope", "year"]);
    }
}
