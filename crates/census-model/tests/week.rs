//! Calendar week arithmetic.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use census_model::CalendarWeek;

fn week_of(y: i32, m: u32, d: u32) -> CalendarWeek {
    CalendarWeek::from_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn long_iso_year_has_week_53() {
    let week = week_of(2020, 12, 31);
    assert_eq!(week.year(), 2020);
    assert_eq!(week.week(), 53);
    assert_eq!(week.plus_weeks(1).unwrap().to_string(), "2021-01");
}

#[test]
fn fifty_two_weeks_back_is_not_always_same_week_number() {
    // 2020 has 53 ISO weeks, so 52 weeks back lands one week number later.
    let week = week_of(2021, 1, 4);
    assert_eq!(week.minus_weeks(52).unwrap().to_string(), "2020-02");
    assert_eq!(week.minus_weeks(53).unwrap().to_string(), "2020-01");
    let week = week_of(2021, 12, 27);
    assert_eq!(week.to_string(), "2021-52");
    assert_eq!(week.minus_weeks(52).unwrap().to_string(), "2020-53");
}

#[test]
fn display_zero_pads_week() {
    assert_eq!(week_of(2022, 1, 5).to_string(), "2022-01");
}

proptest! {
    #[test]
    fn minus_then_plus_is_identity(days in 0u64..20_000, k in 0u32..200) {
        let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Days::new(days);
        let week = CalendarWeek::from_date(start);
        let back = week.minus_weeks(k).unwrap();
        prop_assert_eq!(back.plus_weeks(k).unwrap(), week);
        prop_assert!(k == 0 || back < week);
    }

    #[test]
    fn display_parses_back(days in 0u64..20_000) {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Days::new(days);
        let week = CalendarWeek::from_date(date);
        prop_assert_eq!(week.to_string().parse::<CalendarWeek>().unwrap(), week);
    }
}
