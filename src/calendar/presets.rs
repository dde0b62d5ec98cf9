//! Bundled campaign calendars.

use crate::error::Result;
use super::{
    DateParts, DateTemplates, DayCountCalendar, Interval, LeapRule, Month, MonthCalendar,
    WeekdayRule,
};

/// Plain running day count, the fallback for homebrew settings.
pub fn campaign() -> DayCountCalendar {
    DayCountCalendar::new("Campaign")
}

/// Common Year reckoning: twelve 28-day months and four festival weeks
/// that have no weekday names. 1 CY follows -1 CY directly.
pub fn greyhawk() -> Result<MonthCalendar> {
    MonthCalendar::new(
        "Greyhawk",
        vec![
            Month::festival("Needfest", 7),
            Month::regular("Fireseek", 28),
            Month::regular("Readying", 28),
            Month::regular("Coldeven", 28),
            Month::festival("Growfest", 7),
            Month::regular("Planting", 28),
            Month::regular("Flocktime", 28),
            Month::regular("Wealsun", 28),
            Month::festival("Richfest", 7),
            Month::regular("Reaping", 28),
            Month::regular("Goodmonth", 28),
            Month::regular("Harvester", 28),
            Month::festival("Brewfest", 7),
            Month::regular("Patchwall", 28),
            Month::regular("Ready'reat", 28),
            Month::regular("Sunsebb", 28),
        ],
    )
    .without_year_zero()
    .with_weekdays(WeekdayRule::cycle(
        &["Starday", "Sunday", "Moonday", "Godsday", "Waterday", "Earthday", "Freeday"],
        0,
        true,
    ))
    .with_templates(DateTemplates::new("{day} {month}, {year} CY", "{month}, {year} CY", "{year} CY"))
    .with_default(DateParts::new(591, 1, 1).at(12, 0, 0), Interval::Time)
    .build()
}

/// Galifar reckoning: twelve 28-day months, every year starts on Sul.
pub fn eberron() -> Result<MonthCalendar> {
    let months = [
        "Zarantyr", "Olarune", "Therendor", "Eyre", "Dravago", "Nymm",
        "Lharvion", "Barrakas", "Rhaan", "Sypheros", "Aryth", "Vult",
    ]
    .iter()
    .map(|name| Month::regular(name, 28))
    .collect();

    MonthCalendar::new("Eberron", months)
        .with_weekdays(WeekdayRule::cycle(&["Sul", "Mol", "Zol", "Wir", "Zor", "Far", "Sar"], 0, false))
        .with_templates(DateTemplates::new("{day} {month}, {year} YK", "{month}, {year} YK", "{year} YK"))
        .with_default(DateParts::new(998, 1, 1).at(12, 0, 0), Interval::Time)
        .build()
}

/// Dalereckoning: twelve 30-day months split into tendays, five one-day
/// festivals, and Shieldmeet after Midsummer every fourth year.
pub fn forgotten_realms() -> Result<MonthCalendar> {
    MonthCalendar::new(
        "Forgotten Realms",
        vec![
            Month::regular("Hammer", 30),
            Month::festival("Midwinter", 1),
            Month::regular("Alturiak", 30),
            Month::regular("Ches", 30),
            Month::regular("Tarsakh", 30),
            Month::festival("Greengrass", 1),
            Month::regular("Mirtul", 30),
            Month::regular("Kythorn", 30),
            Month::regular("Flamerule", 30),
            Month::festival("Midsummer", 1),
            Month::festival("Shieldmeet", 0),
            Month::regular("Eleasis", 30),
            Month::regular("Eleint", 30),
            Month::festival("Highharvestide", 1),
            Month::regular("Marpenoth", 30),
            Month::regular("Uktar", 30),
            Month::festival("Feast of the Moon", 1),
            Month::regular("Nightal", 30),
        ],
    )
    .with_leap_rule(LeapRule::every(4, 10))
    .with_week_length(10)
    .with_templates(DateTemplates::new("{month} {day}, {year} DR", "{month}, {year} DR", "{year} DR"))
    .with_default(DateParts::new(1491, 1, 1).at(12, 0, 0), Interval::Time)
    .build()
}

/// Proleptic Gregorian calendar, 1 BC followed by AD 1.
pub fn gregorian() -> Result<MonthCalendar> {
    MonthCalendar::new(
        "Gregorian",
        vec![
            Month::regular("January", 31),
            Month::regular("February", 28),
            Month::regular("March", 31),
            Month::regular("April", 30),
            Month::regular("May", 31),
            Month::regular("June", 30),
            Month::regular("July", 31),
            Month::regular("August", 31),
            Month::regular("September", 30),
            Month::regular("October", 31),
            Month::regular("November", 30),
            Month::regular("December", 31),
        ],
    )
    .with_leap_rule(LeapRule::gregorian(1))
    .without_year_zero()
    // 1 January of year 1 was a Monday
    .with_weekdays(WeekdayRule::cycle(
        &["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"],
        1,
        false,
    ))
    .with_templates(DateTemplates::new("{month} {day}, {year}", "{month} {year}", "{year}"))
    .with_default(DateParts::new(2018, 1, 1).at(12, 0, 0), Interval::Time)
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{render, Calendar, SECONDS_PER_DAY};
    use crate::error::DecampError;
    use proptest::prelude::*;

    fn day(cal: &dyn Calendar, year: i64, month: u32, day: i64) -> i64 {
        cal.encode(&DateParts::new(year, month, day), Interval::Day).unwrap()
    }

    fn ymd(cal: &dyn Calendar, scalar: i64) -> (i64, u32, i64) {
        let parts = cal.decode(scalar);
        (parts.year, parts.month, parts.day)
    }

    #[test]
    fn test_gregorian_leap_years() {
        let cal = gregorian().unwrap();
        assert!(cal.is_leap_year(2000));
        assert!(!cal.is_leap_year(1900));
        assert!(cal.is_leap_year(2024));
        assert!(!cal.is_leap_year(2023));
        assert!(cal.is_leap_year(-1));
        assert!(!cal.is_leap_year(0));
    }

    #[test]
    fn test_gregorian_weekdays() {
        let cal = gregorian().unwrap();
        assert_eq!(cal.weekday(day(&cal, 2001, 1, 1)), Some("Monday"));
        assert_eq!(cal.weekday(day(&cal, 2024, 1, 1)), Some("Monday"));
        assert_eq!(cal.weekday(day(&cal, 2024, 2, 29)), Some("Thursday"));
        assert_eq!(cal.weekday(day(&cal, 1776, 7, 4)), Some("Thursday"));
        assert_eq!(cal.weekday(day(&cal, 1969, 7, 20)), Some("Sunday"));
    }

    #[test]
    fn test_gregorian_no_year_zero() {
        let cal = gregorian().unwrap();
        assert!(cal.encode(&DateParts::new(0, 1, 1), Interval::Year).is_err());
        let new_year = day(&cal, 1, 1, 1);
        assert_eq!(new_year, 0);
        assert_eq!(ymd(&cal, new_year - SECONDS_PER_DAY), (-1, 12, 31));
        let shifted = cal.add(day(&cal, -1, 6, 15), 1, Interval::Year).unwrap();
        assert_eq!(ymd(&cal, shifted), (1, 6, 15));
    }

    #[test]
    fn test_gregorian_month_walk() {
        let cal = gregorian().unwrap();
        assert_eq!(ymd(&cal, cal.add(day(&cal, 2024, 1, 31), 1, Interval::Month).unwrap()), (2024, 2, 29));
        assert_eq!(ymd(&cal, cal.add(day(&cal, 2023, 1, 31), 1, Interval::Month).unwrap()), (2023, 2, 28));
        assert_eq!(ymd(&cal, cal.add(day(&cal, 2023, 11, 15), 3, Interval::Month).unwrap()), (2024, 2, 15));
        assert_eq!(ymd(&cal, cal.add(day(&cal, 2024, 3, 10), -14, Interval::Month).unwrap()), (2023, 1, 10));
    }

    #[test]
    fn test_gregorian_year_walk_from_leap_day() {
        let cal = gregorian().unwrap();
        assert_eq!(ymd(&cal, cal.add(day(&cal, 2024, 2, 29), 1, Interval::Year).unwrap()), (2025, 2, 28));
        assert_eq!(ymd(&cal, cal.add(day(&cal, 2024, 2, 29), 4, Interval::Year).unwrap()), (2028, 2, 29));
    }

    #[test]
    fn test_gregorian_year_is_not_constant() {
        let cal = gregorian().unwrap();
        assert!(!cal.is_constant(Interval::Year));
        assert!(!cal.is_constant(Interval::Month));
        assert!(cal.is_constant(Interval::Week));
        let start = day(&cal, 2023, 3, 1);
        let next = cal.add(start, 1, Interval::Year).unwrap();
        assert_eq!((next - start) / SECONDS_PER_DAY, 366);
    }

    #[test]
    fn test_greyhawk_festivals() {
        let cal = greyhawk().unwrap();
        let needfest = day(&cal, 591, 1, 3);
        assert_eq!(cal.weekday(needfest), None);
        assert_eq!(cal.weekday(day(&cal, 591, 2, 1)), Some("Starday"));
        assert_eq!(cal.weekday(day(&cal, 591, 2, 9)), Some("Sunday"));
        assert_eq!(cal.weekday(day(&cal, 592, 6, 7)), Some("Freeday"));
        assert_eq!(ymd(&cal, cal.add(needfest, 1, Interval::Month).unwrap()), (591, 3, 3));
        assert_eq!(ymd(&cal, cal.add(day(&cal, 591, 4, 10), 1, Interval::Month).unwrap()), (591, 6, 10));
        assert_eq!(ymd(&cal, cal.add(day(&cal, 591, 16, 10), 1, Interval::Month).unwrap()), (592, 2, 10));
    }

    #[test]
    fn test_greyhawk_has_no_year_zero() {
        let cal = greyhawk().unwrap();
        assert!(matches!(
            cal.encode(&DateParts::new(0, 2, 1), Interval::Day),
            Err(DecampError::InvalidDate(_))
        ));
        let first = day(&cal, 1, 2, 1);
        assert_eq!(ymd(&cal, cal.add(first, -1, Interval::Year).unwrap()), (-1, 2, 1));
        assert_eq!(ymd(&cal, first - 30 * SECONDS_PER_DAY), (-1, 16, 6));
        assert_eq!(cal.weekday(day(&cal, -1, 2, 1)), Some("Starday"));
    }

    #[test]
    fn test_eberron_constant_months() {
        let cal = eberron().unwrap();
        assert!(cal.is_constant(Interval::Month));
        assert!(cal.is_constant(Interval::Year));
        let start = day(&cal, 998, 12, 20);
        assert_eq!(ymd(&cal, cal.add(start, 1, Interval::Month).unwrap()), (999, 1, 20));
        assert_eq!(cal.weekday(day(&cal, 998, 1, 1)), Some("Sul"));
        assert_eq!(cal.weekday(day(&cal, 1002, 5, 10)), Some("Zol"));
    }

    #[test]
    fn test_forgotten_realms_shieldmeet() {
        let cal = forgotten_realms().unwrap();
        assert!(cal.is_leap_year(1492));
        assert!(cal.encode(&DateParts::new(1491, 11, 1), Interval::Day).is_err());
        let shieldmeet = day(&cal, 1492, 11, 1);
        assert_eq!(ymd(&cal, shieldmeet - SECONDS_PER_DAY), (1492, 10, 1));
        assert_eq!(ymd(&cal, shieldmeet + SECONDS_PER_DAY), (1492, 12, 1));
        assert_eq!(ymd(&cal, cal.add(shieldmeet, 1, Interval::Year).unwrap()), (1493, 10, 1));
        assert_eq!(ymd(&cal, cal.add(shieldmeet, 4, Interval::Year).unwrap()), (1496, 11, 1));
        assert_eq!(cal.weekday(shieldmeet), None);
    }

    #[test]
    fn test_forgotten_realms_year_lengths() {
        let cal = forgotten_realms().unwrap();
        let a = day(&cal, 1491, 1, 1);
        let b = day(&cal, 1492, 1, 1);
        let c = day(&cal, 1493, 1, 1);
        assert_eq!((b - a) / SECONDS_PER_DAY, 365);
        assert_eq!((c - b) / SECONDS_PER_DAY, 366);
        assert_eq!(ymd(&cal, cal.add(day(&cal, 1491, 9, 5), 1, Interval::Month).unwrap()), (1491, 12, 5));
    }

    #[test]
    fn test_rendering() {
        let cal = gregorian().unwrap();
        let scalar = cal
            .encode(&DateParts::new(2024, 2, 29).at(14, 5, 9), Interval::Second)
            .unwrap();
        assert_eq!(render(&cal, scalar, Interval::Second, true, true), "Thursday, February 29, 2024 14:05:09");
        assert_eq!(render(&cal, scalar, Interval::Minute, true, true), "Thursday, February 29, 2024 14:05");
        assert_eq!(render(&cal, scalar, Interval::Time, true, true), "Thursday, February 29, 2024 Afternoon");
        assert_eq!(render(&cal, scalar, Interval::Time, false, true), "Afternoon");
        assert_eq!(render(&cal, scalar, Interval::Day, true, true), "Thursday, February 29, 2024");
        assert_eq!(render(&cal, scalar, Interval::Month, true, false), "February 2024");
        assert_eq!(render(&cal, scalar, Interval::Year, false, false), "2024");

        let greyhawk = greyhawk().unwrap();
        let scalar = day(&greyhawk, 591, 2, 9);
        assert_eq!(render(&greyhawk, scalar, Interval::Day, true, false), "Sunday, 9 Fireseek, 591 CY");
        assert_eq!(render(&greyhawk, scalar, Interval::Week, true, false), "Week 2 of Fireseek, 591 CY");

        let realms = forgotten_realms().unwrap();
        let scalar = day(&realms, 1491, 3, 12);
        assert_eq!(render(&realms, scalar, Interval::Day, true, false), "Alturiak 12, 1491 DR");
    }

    #[test]
    fn test_year_precision_drops_finer_parts() {
        let cal = greyhawk().unwrap();
        let parts = DateParts::new(600, 9, 5).at(18, 0, 0);
        let scalar = cal.encode(&parts, Interval::Year).unwrap();
        let decoded = cal.decode(scalar);
        assert_eq!((decoded.year, decoded.month, decoded.day, decoded.hour), (600, 1, 1, 0));
    }

    fn round_trip(cal: &dyn Calendar, year: i64, month: u32, day: i64, clock: (u32, u32, u32)) {
        let parts = DateParts::new(year, month, day)
            .at(clock.0, clock.1, clock.2)
            .with_week_length(cal.week_length());
        if let Ok(scalar) = cal.encode(&parts, Interval::Second) {
            assert_eq!(cal.decode(scalar), parts);
        }
    }

    proptest! {
        #[test]
        fn prop_gregorian_round_trip(year in -3000i64..3000, month in 1u32..=12, day in 1i64..=31,
                                      h in 0u32..24, m in 0u32..60, s in 0u32..60) {
            round_trip(&gregorian().unwrap(), year, month, day, (h, m, s));
        }

        #[test]
        fn prop_greyhawk_round_trip(year in -500i64..1500, month in 1u32..=16, day in 1i64..=28,
                                     h in 0u32..24, m in 0u32..60, s in 0u32..60) {
            round_trip(&greyhawk().unwrap(), year, month, day, (h, m, s));
        }

        #[test]
        fn prop_realms_round_trip(year in -500i64..2000, month in 1u32..=18, day in 1i64..=30,
                                   h in 0u32..24, m in 0u32..60, s in 0u32..60) {
            round_trip(&forgotten_realms().unwrap(), year, month, day, (h, m, s));
        }

        #[test]
        fn prop_day_count_round_trip(day in -10_000i64..10_000, h in 0u32..24, m in 0u32..60, s in 0u32..60) {
            round_trip(&campaign(), 1, 1, day, (h, m, s));
        }

        #[test]
        fn prop_gregorian_days_are_contiguous(days in -1_000_000i64..1_000_000) {
            let cal = gregorian().unwrap();
            let scalar = days * SECONDS_PER_DAY;
            let parts = cal.decode(scalar);
            let next = cal.decode(scalar + SECONDS_PER_DAY);
            let same_month = next.year == parts.year && next.month == parts.month && next.day == parts.day + 1;
            let month_rollover = next.day == 1;
            prop_assert!(same_month || month_rollover);
            prop_assert_eq!(cal.encode(&parts, Interval::Day).unwrap(), scalar);
        }
    }
}
