//! Month-table calendars.
//!
//! Years are a fixed sequence of months. Festival months sit outside the
//! regular month count (and optionally outside the weekday cycle); a
//! leap rule adds one day to a chosen month, which lets a zero-length
//! festival exist only in leap years. Calendars without a year zero go
//! straight from year -1 to year 1.

use serde::{Deserialize, Serialize};

use crate::error::{DecampError, Result};
use super::leap::LeapRule;
use super::{
    clock_seconds, fill_template, offset, scale, split_clock, week_of, Calendar, DateParts,
    Interval, SECONDS_PER_DAY,
};

/// One entry of the month table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub name: String,
    pub days: u32,
    pub festival: bool,
}

impl Month {
    pub fn regular(name: &str, days: u32) -> Self {
        Self { name: name.to_string(), days, festival: false }
    }

    pub fn festival(name: &str, days: u32) -> Self {
        Self { name: name.to_string(), days, festival: true }
    }
}

/// How weekday names are assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekdayRule {
    /// The calendar has no named weekdays.
    Unnamed,
    /// Weekdays cycle over `names`; `epoch_weekday` is the weekday of
    /// scalar day 0. Festival days can be excluded from the cycle.
    Cycle {
        names: Vec<String>,
        epoch_weekday: usize,
        skip_festivals: bool,
    },
}

impl WeekdayRule {
    pub fn cycle(names: &[&str], epoch_weekday: usize, skip_festivals: bool) -> Self {
        WeekdayRule::Cycle {
            names: names.iter().map(|n| n.to_string()).collect(),
            epoch_weekday,
            skip_festivals,
        }
    }
}

/// Date templates per precision, with `{year}`, `{month}`, `{week}` and
/// `{day}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTemplates {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateTemplates {
    pub fn new(day: &str, month: &str, year: &str) -> Self {
        Self {
            day: day.to_string(),
            month: month.to_string(),
            year: year.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MonthCalendar {
    name: String,
    months: Vec<Month>,
    leap: Option<LeapRule>,
    weekdays: WeekdayRule,
    week_length: i64,
    no_year_zero: bool,
    templates: DateTemplates,
    default: (DateParts, Interval),
}

impl MonthCalendar {
    pub fn new(name: &str, months: Vec<Month>) -> Self {
        Self {
            name: name.to_string(),
            months,
            leap: None,
            weekdays: WeekdayRule::Unnamed,
            week_length: 7,
            no_year_zero: false,
            templates: DateTemplates::new("{day} {month}, {year}", "{month}, {year}", "{year}"),
            default: (DateParts::new(1, 1, 1).at(12, 0, 0), Interval::Time),
        }
    }

    pub fn with_leap_rule(mut self, rule: LeapRule) -> Self {
        self.leap = Some(rule);
        self
    }

    /// Named weekdays; the week length follows the number of names.
    pub fn with_weekdays(mut self, rule: WeekdayRule) -> Self {
        if let WeekdayRule::Cycle { names, .. } = &rule {
            self.week_length = names.len() as i64;
        }
        self.weekdays = rule;
        self
    }

    pub fn with_week_length(mut self, days: i64) -> Self {
        self.week_length = days;
        self
    }

    pub fn without_year_zero(mut self) -> Self {
        self.no_year_zero = true;
        self
    }

    pub fn with_templates(mut self, templates: DateTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_default(mut self, parts: DateParts, precision: Interval) -> Self {
        self.default = (parts.with_week_length(self.week_length), precision);
        self
    }

    /// Check the configuration and return the finished calendar.
    pub fn build(self) -> Result<Self> {
        if !self.months.iter().any(|m| !m.festival && m.days > 0) {
            return Err(DecampError::Config(format!(
                "calendar {} needs at least one regular month",
                self.name
            )));
        }
        if self.week_length < 1 {
            return Err(DecampError::Config(format!("calendar {} has no week length", self.name)));
        }
        if let Some(rule) = &self.leap {
            if rule.leap_month() >= self.months.len() {
                return Err(DecampError::Config(format!(
                    "leap month {} is outside the month table of {}",
                    rule.leap_month(),
                    self.name
                )));
            }
        }
        if let WeekdayRule::Cycle { names, epoch_weekday, .. } = &self.weekdays {
            if names.is_empty() || *epoch_weekday >= names.len() {
                return Err(DecampError::Config(format!("bad weekday table for {}", self.name)));
            }
        }
        Ok(self)
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    // -- year arithmetic ------------------------------------------------------

    fn shift(&self) -> i64 {
        if self.no_year_zero { 1 } else { 0 }
    }

    fn internal_year(&self, year: i64) -> Result<i64> {
        if !self.no_year_zero {
            return Ok(year);
        }
        match year {
            0 => Err(DecampError::InvalidDate(format!("{} has no year 0", self.name))),
            y if y > 0 => Ok(y - 1),
            y => Ok(y),
        }
    }

    fn displayed_year(&self, internal: i64) -> i64 {
        if self.no_year_zero && internal >= 0 { internal + 1 } else { internal }
    }

    fn is_leap_internal(&self, internal: i64) -> bool {
        self.leap
            .as_ref()
            .map(|rule| rule.is_leap(internal + self.shift()))
            .unwrap_or(false)
    }

    fn common_year_days(&self) -> i64 {
        self.months.iter().map(|m| m.days as i64).sum()
    }

    fn leap_days_before(&self, internal: i64) -> i64 {
        match &self.leap {
            Some(rule) => rule.leap_years_before(internal + self.shift()) - rule.leap_years_before(self.shift()),
            None => 0,
        }
    }

    /// Days from the start of internal year 0 to the start of `internal`.
    fn days_before_year(&self, internal: i64) -> i64 {
        internal * self.common_year_days() + self.leap_days_before(internal)
    }

    fn month_len(&self, internal: i64, month: usize) -> i64 {
        let mut days = self.months[month].days as i64;
        if let Some(rule) = &self.leap {
            if rule.leap_month() == month && self.is_leap_internal(internal) {
                days += 1;
            }
        }
        days
    }

    fn days_before_month(&self, internal: i64, month: usize) -> i64 {
        (0..month).map(|m| self.month_len(internal, m)).sum()
    }

    /// Internal year containing `day` and the 0-based day within it.
    fn year_of_day(&self, day: i64) -> (i64, i64) {
        let common = self.common_year_days();
        let (cycle_years, cycle_leaps) = match &self.leap {
            Some(rule) => (rule.cycle_years(), rule.cycle_leap_days()),
            None => (1, 0),
        };
        let cycle_days = cycle_years * common + cycle_leaps;
        let mut year = (day as i128 * cycle_years as i128).div_euclid(cycle_days as i128) as i64;
        while self.days_before_year(year) > day {
            year -= 1;
        }
        while self.days_before_year(year + 1) <= day {
            year += 1;
        }
        (year, day - self.days_before_year(year))
    }

    /// (internal year, 0-based month, day of month, seconds into day)
    fn split(&self, scalar: i64) -> (i64, usize, i64, i64) {
        let days = scalar.div_euclid(SECONDS_PER_DAY);
        let seconds = scalar.rem_euclid(SECONDS_PER_DAY);
        let (year, mut day_of_year) = self.year_of_day(days);
        let mut month = 0;
        for m in 0..self.months.len() {
            let len = self.month_len(year, m);
            if day_of_year < len {
                month = m;
                break;
            }
            day_of_year -= len;
        }
        (year, month, day_of_year + 1, seconds)
    }

    fn join(&self, internal: i64, month: usize, day: i64, seconds: i64) -> Result<i64> {
        let days = self.days_before_year(internal) + self.days_before_month(internal, month) + day - 1;
        offset(scale(days, SECONDS_PER_DAY)?, seconds)
    }

    // -- month walking --------------------------------------------------------

    fn is_regular(&self, internal: i64, month: usize) -> bool {
        !self.months[month].festival && self.month_len(internal, month) > 0
    }

    fn next_month(&self, internal: i64, month: usize) -> (i64, usize) {
        if month + 1 >= self.months.len() { (internal + 1, 0) } else { (internal, month + 1) }
    }

    fn prev_month(&self, internal: i64, month: usize) -> (i64, usize) {
        if month == 0 { (internal - 1, self.months.len() - 1) } else { (internal, month - 1) }
    }

    fn regular_month_count(&self) -> i64 {
        self.months.iter().filter(|m| !m.festival && m.days > 0).count() as i64
    }

    /// Whether every year has the same set of regular months.
    fn regular_months_fixed(&self) -> bool {
        match &self.leap {
            Some(rule) => {
                let month = &self.months[rule.leap_month()];
                month.festival || month.days > 0
            }
            None => true,
        }
    }

    fn add_months(&self, scalar: i64, amount: i64) -> Result<i64> {
        let (mut year, mut month, day, seconds) = self.split(scalar);
        // a festival counts as the start of the following regular month
        while !self.is_regular(year, month) {
            (year, month) = self.next_month(year, month);
        }
        let mut steps = amount;
        if self.regular_months_fixed() {
            let per_year = self.regular_month_count();
            year += steps / per_year;
            steps %= per_year;
        }
        for _ in 0..steps.abs() {
            loop {
                (year, month) = if steps > 0 {
                    self.next_month(year, month)
                } else {
                    self.prev_month(year, month)
                };
                if self.is_regular(year, month) {
                    break;
                }
            }
        }
        let day = day.min(self.month_len(year, month));
        self.join(year, month, day, seconds)
    }

    fn add_years(&self, scalar: i64, amount: i64) -> Result<i64> {
        let (year, mut month, day, seconds) = self.split(scalar);
        let mut year = year
            .checked_add(amount)
            .ok_or_else(|| DecampError::InvalidDate(format!("{} years out of range", amount)))?;
        if self.month_len(year, month) == 0 {
            // e.g. a leap-only festival in a common year: land on the day before it
            loop {
                (year, month) = self.prev_month(year, month);
                if self.month_len(year, month) > 0 {
                    break;
                }
            }
            let last = self.month_len(year, month);
            return self.join(year, month, last, seconds);
        }
        let day = day.min(self.month_len(year, month));
        self.join(year, month, day, seconds)
    }

    // -- weekdays -------------------------------------------------------------

    fn festival_days_before(&self, internal: i64, month: usize) -> i64 {
        let per_year: i64 = self.months.iter().filter(|m| m.festival).map(|m| m.days as i64).sum();
        let leap_festival = self
            .leap
            .as_ref()
            .map(|rule| self.months[rule.leap_month()].festival)
            .unwrap_or(false);
        let mut days = internal * per_year;
        if leap_festival {
            days += self.leap_days_before(internal);
        }
        days + (0..month)
            .filter(|m| self.months[*m].festival)
            .map(|m| self.month_len(internal, m))
            .sum::<i64>()
    }
}

impl Calendar for MonthCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, parts: &DateParts, precision: Interval) -> Result<i64> {
        let year = self.internal_year(parts.year)?;
        let mut days = self.days_before_year(year);

        if precision >= Interval::Month {
            let index = parts.month as usize;
            if index == 0 || index > self.months.len() {
                return Err(DecampError::InvalidDate(format!(
                    "{} has no month {}",
                    self.name, parts.month
                )));
            }
            let month = index - 1;
            let len = self.month_len(year, month);
            if len == 0 {
                return Err(DecampError::InvalidDate(format!(
                    "{} does not occur in year {}",
                    self.months[month].name, parts.year
                )));
            }
            days += self.days_before_month(year, month);

            let day_offset = if precision == Interval::Week {
                (parts.week - 1) * self.week_length
            } else if precision >= Interval::Day {
                parts.day - 1
            } else {
                0
            };
            if day_offset < 0 || day_offset >= len {
                return Err(DecampError::InvalidDate(format!(
                    "{} {} has only {} days",
                    self.months[month].name, parts.year, len
                )));
            }
            days += day_offset;
        }

        offset(scale(days, SECONDS_PER_DAY)?, clock_seconds(parts, precision)?)
    }

    fn decode(&self, scalar: i64) -> DateParts {
        let (year, month, day, seconds) = self.split(scalar);
        let (hour, minute, second) = split_clock(seconds);
        DateParts {
            year: self.displayed_year(year),
            month: month as u32 + 1,
            week: week_of(day, self.week_length),
            day,
            hour,
            minute,
            second,
        }
    }

    fn add(&self, scalar: i64, amount: i64, unit: Interval) -> Result<i64> {
        match unit {
            Interval::Time => Err(DecampError::InvalidUnit {
                unit,
                calendar: self.name.clone(),
            }),
            Interval::Year if !self.is_constant(unit) => self.add_years(scalar, amount),
            Interval::Month if !self.is_constant(unit) => self.add_months(scalar, amount),
            _ => {
                let length = self.nominal_length(unit).unwrap_or(SECONDS_PER_DAY);
                offset(scalar, scale(amount, length)?)
            }
        }
    }

    fn is_constant(&self, unit: Interval) -> bool {
        match unit {
            Interval::Time => false,
            Interval::Year => self.leap.is_none(),
            Interval::Month => {
                let first = self.months[0].days;
                self.leap.is_none() && self.months.iter().all(|m| !m.festival && m.days == first)
            }
            _ => true,
        }
    }

    fn is_leap_year(&self, year: i64) -> bool {
        match self.internal_year(year) {
            Ok(internal) => self.is_leap_internal(internal),
            Err(_) => false,
        }
    }

    fn weekday(&self, scalar: i64) -> Option<&str> {
        let WeekdayRule::Cycle { names, epoch_weekday, skip_festivals } = &self.weekdays else {
            return None;
        };
        let (year, month, _, _) = self.split(scalar);
        let mut days = scalar.div_euclid(SECONDS_PER_DAY);
        if *skip_festivals {
            if self.months[month].festival {
                return None;
            }
            days -= self.festival_days_before(year, month);
        }
        let index = (days + *epoch_weekday as i64).rem_euclid(names.len() as i64);
        names.get(index as usize).map(|n| n.as_str())
    }

    fn month_name(&self, month: u32) -> Option<&str> {
        let index = (month as usize).checked_sub(1)?;
        self.months.get(index).map(|m| m.name.as_str())
    }

    fn week_length(&self) -> i64 {
        self.week_length
    }

    fn nominal_length(&self, unit: Interval) -> Option<i64> {
        match unit {
            Interval::Year => Some(self.common_year_days() * SECONDS_PER_DAY),
            Interval::Month => Some(self.common_year_days() / self.regular_month_count().max(1) * SECONDS_PER_DAY),
            Interval::Week => Some(self.week_length * SECONDS_PER_DAY),
            _ => unit.fixed_seconds(),
        }
    }

    fn render_date(&self, parts: &DateParts, precision: Interval) -> String {
        let month = self.month_name(parts.month).unwrap_or("");
        match precision {
            Interval::Year => fill_template(&self.templates.year, parts, month),
            Interval::Month => fill_template(&self.templates.month, parts, month),
            Interval::Week => {
                let template = format!("Week {{week}} of {}", self.templates.month);
                fill_template(&template, parts, month)
            }
            _ => fill_template(&self.templates.day, parts, month),
        }
    }

    fn default_parts(&self) -> (DateParts, Interval) {
        self.default
    }
}
