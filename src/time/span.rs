use std::fmt;
use std::sync::Arc;

use crate::calendar::{Calendar, Interval};

/// Signed duration in seconds. The calendar only supplies unit names and
/// nominal unit lengths for display.
#[derive(Clone)]
pub struct TimeSpan {
    seconds: i64,
    calendar: Arc<dyn Calendar>,
}

impl TimeSpan {
    pub fn new(seconds: i64, calendar: Arc<dyn Calendar>) -> Self {
        Self { seconds, calendar }
    }

    /// `amount` nominal units of the calendar (a "month" is the average
    /// regular month). `Time` has no length.
    pub fn of(amount: i64, unit: Interval, calendar: Arc<dyn Calendar>) -> Option<Self> {
        let length = calendar.nominal_length(unit)?;
        Some(Self::new(amount.checked_mul(length)?, calendar))
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Greedy largest-unit-first description. Only the leading unit is
    /// shown unless `precise` is set.
    pub fn describe(&self, precise: bool) -> String {
        if self.seconds == 0 {
            return "0 seconds".to_string();
        }
        let mut rest = self.seconds.unsigned_abs();
        let mut pieces = Vec::new();
        for unit in Interval::all().iter().filter(|u| **u != Interval::Time) {
            let Some(length) = self.calendar.nominal_length(*unit) else {
                continue;
            };
            let length = length.unsigned_abs();
            if length == 0 || rest < length {
                continue;
            }
            let count = rest / length;
            rest %= length;
            let plural = if count == 1 { "" } else { "s" };
            pieces.push(format!("{} {}{}", count, unit.name(), plural));
            if !precise {
                break;
            }
        }
        let sign = if self.seconds < 0 { "-" } else { "" };
        format!("{}{}", sign, pieces.join(", "))
    }
}

impl PartialEq for TimeSpan {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds
    }
}

impl Eq for TimeSpan {}

impl fmt::Debug for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeSpan({}s, {})", self.seconds, self.calendar.name())
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(false))
    }
}
