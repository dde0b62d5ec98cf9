//! Fictional calendars.
//!
//! A calendar maps a scalar instant (seconds since a calendar-specific
//! epoch) to structured date parts and back, and knows how to add
//! calendar units to an instant. Two representations exist:
//! [`DayCountCalendar`] (a bare running day number) and [`MonthCalendar`]
//! (years made of a month table, configured by data: festival months,
//! optional leap cycle, weekday names, era without a year zero).

pub mod day_count;
pub mod leap;
pub mod month;
pub mod presets;
pub mod registry;

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecampError, Result};

pub use day_count::DayCountCalendar;
pub use leap::{LeapRule, LeapTerm};
pub use month::{DateTemplates, Month, MonthCalendar, WeekdayRule};
pub use registry::CalendarRegistry;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

// =============================================================================
// INTERVAL
// =============================================================================

/// Calendar units, ordered from coarsest to finest.
///
/// Doubles as the precision of a timestamp. `Time` is the qualitative
/// time of day ("Morning", "Evening"): it sits between day and hour and
/// cannot be used for arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Year,
    Month,
    Week,
    Day,
    Time,
    Hour,
    Minute,
    Second,
}

impl Interval {
    /// All intervals in order.
    pub fn all() -> &'static [Interval] {
        &[
            Interval::Year,
            Interval::Month,
            Interval::Week,
            Interval::Day,
            Interval::Time,
            Interval::Hour,
            Interval::Minute,
            Interval::Second,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interval::Year => "year",
            Interval::Month => "month",
            Interval::Week => "week",
            Interval::Day => "day",
            Interval::Time => "time",
            Interval::Hour => "hour",
            Interval::Minute => "minute",
            Interval::Second => "second",
        }
    }

    /// Length in seconds for units whose length never depends on the date.
    pub fn fixed_seconds(&self) -> Option<i64> {
        match self {
            Interval::Day => Some(SECONDS_PER_DAY),
            Interval::Hour => Some(SECONDS_PER_HOUR),
            Interval::Minute => Some(SECONDS_PER_MINUTE),
            Interval::Second => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let trimmed = lower.strip_suffix('s').unwrap_or(&lower);
        Interval::all()
            .iter()
            .copied()
            .find(|i| i.name() == trimmed)
            .ok_or_else(|| format!("unknown interval '{}'", s))
    }
}

// =============================================================================
// DATE PARTS
// =============================================================================

/// Structured date/time as shown to people.
///
/// `month` is 1-based and indexes the full month table, festivals
/// included. `day` is the day of the month and `week` the week of the
/// month it falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i64,
    pub month: u32,
    pub week: i64,
    pub day: i64,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateParts {
    /// Midnight on the given day; `week` is derived assuming 7-day weeks.
    pub fn new(year: i64, month: u32, day: i64) -> Self {
        Self {
            year,
            month,
            week: week_of(day, 7),
            day,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }

    /// Set the time of day.
    pub fn at(mut self, hour: u32, minute: u32, second: u32) -> Self {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self
    }

    /// Set the week of the month explicitly (used with week precision).
    pub fn in_week(mut self, week: i64) -> Self {
        self.week = week;
        self
    }

    /// Recompute `week` from `day` for a calendar with the given week length.
    pub fn with_week_length(mut self, week_length: i64) -> Self {
        self.week = week_of(self.day, week_length);
        self
    }
}

impl Default for DateParts {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

pub(crate) fn week_of(day: i64, week_length: i64) -> i64 {
    (day - 1).div_euclid(week_length.max(1)) + 1
}

/// Seconds into the day contributed by the clock parts, up to `precision`.
pub(crate) fn clock_seconds(parts: &DateParts, precision: Interval) -> Result<i64> {
    if parts.hour >= 24 || parts.minute >= 60 || parts.second >= 60 {
        return Err(DecampError::InvalidDate(format!(
            "{:02}:{:02}:{:02} is not a time of day",
            parts.hour, parts.minute, parts.second
        )));
    }
    let mut seconds = 0;
    if precision >= Interval::Time {
        seconds += parts.hour as i64 * SECONDS_PER_HOUR;
    }
    if precision >= Interval::Minute {
        seconds += parts.minute as i64 * SECONDS_PER_MINUTE;
    }
    if precision >= Interval::Second {
        seconds += parts.second as i64;
    }
    Ok(seconds)
}

/// Split seconds-into-day into hour, minute, second.
pub(crate) fn split_clock(seconds: i64) -> (u32, u32, u32) {
    let hour = seconds / SECONDS_PER_HOUR;
    let minute = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let second = seconds % SECONDS_PER_MINUTE;
    (hour as u32, minute as u32, second as u32)
}

pub(crate) fn scale(amount: i64, seconds: i64) -> Result<i64> {
    amount
        .checked_mul(seconds)
        .ok_or_else(|| DecampError::InvalidDate(format!("{} units of {}s overflows", amount, seconds)))
}

pub(crate) fn offset(scalar: i64, delta: i64) -> Result<i64> {
    scalar
        .checked_add(delta)
        .ok_or_else(|| DecampError::InvalidDate("instant out of range".to_string()))
}

// =============================================================================
// CALENDAR
// =============================================================================

/// Conversion rules between scalar instants and dates.
///
/// Implementations are stateless; a timestamp carries an
/// `Arc<dyn Calendar>` only to dispatch arithmetic and rendering.
pub trait Calendar: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Scalar instant for `parts`, summing unit contributions only down
    /// to `precision`.
    fn encode(&self, parts: &DateParts, precision: Interval) -> Result<i64>;

    /// Inverse of [`Calendar::encode`] at full precision.
    fn decode(&self, scalar: i64) -> DateParts;

    /// Add `amount` of `unit` to `scalar`.
    fn add(&self, scalar: i64, amount: i64, unit: Interval) -> Result<i64>;

    /// Whether `unit` always has the same length in this calendar.
    fn is_constant(&self, unit: Interval) -> bool;

    /// Leap test on a displayed year.
    fn is_leap_year(&self, year: i64) -> bool;

    /// Weekday name, or `None` where the calendar has none for that day.
    fn weekday(&self, scalar: i64) -> Option<&str>;

    fn month_name(&self, month: u32) -> Option<&str>;

    fn week_length(&self) -> i64;

    /// Typical length of `unit` in seconds, for describing durations.
    fn nominal_length(&self, unit: Interval) -> Option<i64>;

    /// Render the date portion of `parts` at `precision`.
    fn render_date(&self, parts: &DateParts, precision: Interval) -> String;

    /// Starting date of a fresh campaign in this calendar.
    fn default_parts(&self) -> (DateParts, Interval);
}

/// Qualitative time-of-day bucket for an hour of the day.
pub fn fuzzy_time(hour: u32) -> &'static str {
    match hour {
        0 => "Midnight",
        1..=5 => "Early Morning",
        6..=10 => "Morning",
        11 => "Late Morning",
        12 => "Noon",
        13..=16 => "Afternoon",
        17..=20 => "Evening",
        _ => "Night",
    }
}

/// Render an instant with the calendar's templates.
///
/// Time is dropped at day precision or coarser; if no time is wanted the
/// date is always shown.
pub fn render(calendar: &dyn Calendar, scalar: i64, precision: Interval, date: bool, time: bool) -> String {
    let time = time && precision > Interval::Day;
    let date = date || !time;
    let parts = calendar.decode(scalar);
    let mut out = String::new();

    if date {
        if precision >= Interval::Day {
            if let Some(weekday) = calendar.weekday(scalar) {
                out.push_str(weekday);
                out.push_str(", ");
            }
        }
        out.push_str(&calendar.render_date(&parts, precision));
    }
    if date && time {
        out.push(' ');
    }
    if time {
        if precision == Interval::Time {
            out.push_str(fuzzy_time(parts.hour));
        } else {
            let _ = write!(out, "{:02}", parts.hour);
            if precision >= Interval::Minute {
                let _ = write!(out, ":{:02}", parts.minute);
            }
            if precision >= Interval::Second {
                let _ = write!(out, ":{:02}", parts.second);
            }
        }
    }
    out
}

/// Fill `{year}`, `{month}`, `{week}` and `{day}` placeholders.
pub(crate) fn fill_template(template: &str, parts: &DateParts, month_name: &str) -> String {
    template
        .replace("{year}", &parts.year.to_string())
        .replace("{month}", month_name)
        .replace("{week}", &parts.week.to_string())
        .replace("{day}", &parts.day.to_string())
}
