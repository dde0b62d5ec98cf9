//! Calendar-bound instants.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use std::sync::Arc;

use crate::calendar::{render, Calendar, DateParts, Interval};
use crate::error::Result;
use super::span::TimeSpan;

/// An immutable instant in a campaign calendar.
///
/// Equality, ordering and hashing look at the scalar value only. The
/// precision limits what is rendered; the calendar is carried to dispatch
/// arithmetic and formatting.
#[derive(Clone)]
pub struct Timestamp {
    value: i64,
    precision: Interval,
    calendar: Arc<dyn Calendar>,
}

impl Timestamp {
    /// Encode `parts` down to `precision`.
    pub fn new(calendar: Arc<dyn Calendar>, parts: &DateParts, precision: Interval) -> Result<Self> {
        let value = calendar.encode(parts, precision)?;
        Ok(Self { value, precision, calendar })
    }

    /// The calendar's starting instant for a fresh campaign.
    pub fn default_for(calendar: Arc<dyn Calendar>) -> Result<Self> {
        let (parts, precision) = calendar.default_parts();
        Self::new(calendar, &parts, precision)
    }

    pub fn from_scalar(calendar: Arc<dyn Calendar>, value: i64, precision: Interval) -> Self {
        Self { value, precision, calendar }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn precision(&self) -> Interval {
        self.precision
    }

    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Same instant, different display precision.
    pub fn with_precision(&self, precision: Interval) -> Self {
        Self { precision, ..self.clone() }
    }

    /// Decomposed date at full precision.
    pub fn parts(&self) -> DateParts {
        self.calendar.decode(self.value)
    }

    pub fn weekday(&self) -> Option<&str> {
        self.calendar.weekday(self.value)
    }

    /// Add `amount` calendar units, keeping the precision.
    pub fn add(&self, amount: i64, unit: Interval) -> Result<Self> {
        let value = self.calendar.add(self.value, amount, unit)?;
        Ok(Self { value, ..self.clone() })
    }

    pub fn format(&self, date: bool, time: bool) -> String {
        render(self.calendar.as_ref(), self.value, self.precision, date, time)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timestamp")
            .field("value", &self.value)
            .field("precision", &self.precision)
            .field("calendar", &self.calendar.name())
            .finish()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(true, true))
    }
}

// Operator arithmetic saturates at the ends of the scalar range.

impl Sub for &Timestamp {
    type Output = TimeSpan;

    fn sub(self, rhs: &Timestamp) -> TimeSpan {
        TimeSpan::new(self.value.saturating_sub(rhs.value), self.calendar.clone())
    }
}

impl Add<&TimeSpan> for &Timestamp {
    type Output = Timestamp;

    fn add(self, span: &TimeSpan) -> Timestamp {
        Timestamp { value: self.value.saturating_add(span.seconds()), ..self.clone() }
    }
}

impl Sub<&TimeSpan> for &Timestamp {
    type Output = Timestamp;

    fn sub(self, span: &TimeSpan) -> Timestamp {
        Timestamp { value: self.value.saturating_sub(span.seconds()), ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::presets;
    use std::collections::BTreeMap;

    fn gregorian() -> Arc<dyn Calendar> {
        Arc::new(presets::gregorian().unwrap())
    }

    #[test]
    fn test_ordering_ignores_precision() {
        let cal = gregorian();
        let coarse = Timestamp::new(cal.clone(), &DateParts::new(2020, 1, 1), Interval::Year).unwrap();
        let fine = Timestamp::new(cal, &DateParts::new(2020, 1, 1), Interval::Second).unwrap();
        assert_eq!(coarse, fine);
        assert_eq!(coarse.cmp(&fine), Ordering::Equal);
    }

    #[test]
    fn test_btree_key() {
        let cal = gregorian();
        let mut map = BTreeMap::new();
        let late = Timestamp::new(cal.clone(), &DateParts::new(2020, 5, 1), Interval::Day).unwrap();
        let early = Timestamp::new(cal, &DateParts::new(2019, 5, 1), Interval::Day).unwrap();
        map.insert(late.clone(), "late");
        map.insert(early.clone(), "early");
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec!["early", "late"]);
    }

    #[test]
    fn test_span_arithmetic() {
        let cal = gregorian();
        let a = Timestamp::new(cal.clone(), &DateParts::new(2018, 1, 1).at(12, 0, 0), Interval::Hour).unwrap();
        let b = a.add(36, Interval::Hour).unwrap();
        let span = &b - &a;
        assert_eq!(span.seconds(), 36 * 3600);
        assert_eq!(&a + &span, b);
        assert_eq!(&b - &span, a);
        assert_eq!(span.describe(false), "1 day");
    }

    #[test]
    fn test_operators_saturate() {
        let cal = gregorian();
        let ts = Timestamp::default_for(cal.clone()).unwrap();
        let huge = TimeSpan::new(i64::MAX, cal.clone());
        assert_eq!((&ts + &huge).value(), i64::MAX);
        let floor = Timestamp::from_scalar(cal, i64::MIN, Interval::Second);
        assert_eq!((&floor - &huge).value(), i64::MIN);
        assert_eq!((&ts - &floor).seconds(), i64::MAX);
    }

    #[test]
    fn test_time_is_not_addable() {
        let ts = Timestamp::default_for(gregorian()).unwrap();
        assert!(ts.add(1, Interval::Time).is_err());
    }

    #[test]
    fn test_display() {
        let ts = Timestamp::default_for(gregorian()).unwrap();
        assert_eq!(ts.to_string(), "Monday, January 1, 2018 Noon");
        assert_eq!(ts.format(true, false), "Monday, January 1, 2018");
        assert_eq!(ts.with_precision(Interval::Minute).format(false, true), "12:00");
    }
}
