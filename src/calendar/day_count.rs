//! Running day-count calendar ("Day 17").
//!
//! No months or leap logic. Years, months and weeks are shorthand for
//! fixed numbers of days, so every unit except `Time` is constant.

use serde::{Deserialize, Serialize};

use crate::error::{DecampError, Result};
use super::{
    clock_seconds, offset, scale, split_clock, week_of, Calendar, DateParts, Interval,
    SECONDS_PER_DAY,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DayCountCalendar {
    name: String,
    days_per_year: i64,
    days_per_month: i64,
    days_per_week: i64,
    template: String,
}

impl DayCountCalendar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            days_per_year: 365,
            days_per_month: 30,
            days_per_week: 7,
            template: "Day {day}".to_string(),
        }
    }

    fn unit_days(&self, unit: Interval) -> Option<i64> {
        match unit {
            Interval::Year => Some(self.days_per_year),
            Interval::Month => Some(self.days_per_month),
            Interval::Week => Some(self.days_per_week),
            Interval::Day => Some(1),
            _ => None,
        }
    }
}

impl Calendar for DayCountCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, parts: &DateParts, precision: Interval) -> Result<i64> {
        if parts.month == 0 {
            return Err(DecampError::InvalidDate("month 0".to_string()));
        }
        let mut days = (parts.year - 1) * self.days_per_year;
        if precision >= Interval::Month {
            days += (parts.month as i64 - 1) * self.days_per_month;
        }
        if precision == Interval::Week {
            days += (parts.week - 1) * self.days_per_week;
        } else if precision >= Interval::Day {
            days += parts.day - 1;
        }
        offset(scale(days, SECONDS_PER_DAY)?, clock_seconds(parts, precision)?)
    }

    fn decode(&self, scalar: i64) -> DateParts {
        let day = scalar.div_euclid(SECONDS_PER_DAY) + 1;
        let (hour, minute, second) = split_clock(scalar.rem_euclid(SECONDS_PER_DAY));
        DateParts {
            year: 1,
            month: 1,
            week: week_of(day, self.days_per_week),
            day,
            hour,
            minute,
            second,
        }
    }

    fn add(&self, scalar: i64, amount: i64, unit: Interval) -> Result<i64> {
        let seconds = match unit {
            Interval::Time => {
                return Err(DecampError::InvalidUnit {
                    unit,
                    calendar: self.name.clone(),
                })
            }
            Interval::Hour | Interval::Minute | Interval::Second => unit.fixed_seconds().unwrap_or(1),
            _ => self.unit_days(unit).unwrap_or(1) * SECONDS_PER_DAY,
        };
        offset(scalar, scale(amount, seconds)?)
    }

    fn is_constant(&self, unit: Interval) -> bool {
        unit != Interval::Time
    }

    fn is_leap_year(&self, _year: i64) -> bool {
        false
    }

    fn weekday(&self, _scalar: i64) -> Option<&str> {
        None
    }

    fn month_name(&self, _month: u32) -> Option<&str> {
        None
    }

    fn week_length(&self) -> i64 {
        self.days_per_week
    }

    fn nominal_length(&self, unit: Interval) -> Option<i64> {
        self.unit_days(unit)
            .map(|days| days * SECONDS_PER_DAY)
            .or_else(|| unit.fixed_seconds())
    }

    fn render_date(&self, parts: &DateParts, _precision: Interval) -> String {
        super::fill_template(&self.template, parts, "")
    }

    fn default_parts(&self) -> (DateParts, Interval) {
        (DateParts::new(1, 1, 1).at(12, 0, 0), Interval::Time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cal = DayCountCalendar::new("Campaign");
        let parts = DateParts::new(1, 1, 45).at(17, 4, 9);
        let scalar = cal.encode(&parts, Interval::Second).unwrap();
        assert_eq!(cal.decode(scalar), parts);
    }

    #[test]
    fn test_shorthand_units() {
        let cal = DayCountCalendar::new("Campaign");
        let start = cal.encode(&DateParts::new(1, 1, 1), Interval::Day).unwrap();
        assert_eq!(cal.decode(cal.add(start, 1, Interval::Year).unwrap()).day, 366);
        assert_eq!(cal.decode(cal.add(start, 2, Interval::Month).unwrap()).day, 61);
        assert_eq!(cal.decode(cal.add(start, 1, Interval::Week).unwrap()).day, 8);
        assert_eq!(cal.decode(cal.add(start, -3, Interval::Day).unwrap()).day, -2);
        assert!(cal.add(start, 1, Interval::Time).is_err());
    }

    #[test]
    fn test_render() {
        let cal = DayCountCalendar::new("Campaign");
        let scalar = cal.encode(&DateParts::new(1, 1, 12).at(8, 0, 0), Interval::Hour).unwrap();
        assert_eq!(super::super::render(&cal, scalar, Interval::Hour, true, true), "Day 12 08");
        assert_eq!(super::super::render(&cal, scalar, Interval::Time, true, true), "Day 12 Morning");
    }
}
