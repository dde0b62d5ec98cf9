//! Cyclic leap-year rules.
//!
//! A rule is a list of divisibility terms checked from the largest
//! divisor down; the first divisor that divides the year decides. The
//! rule repeats every `cycle_years` (the lcm of the divisors), so leap
//! days before any year can be counted from a prefix table instead of
//! walking years.

use serde::{Deserialize, Serialize};

/// "Every `every` years, the year is (or is not) a leap year."
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeapTerm {
    pub every: i64,
    pub leap: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeapRule {
    terms: Vec<LeapTerm>,
    cycle_years: i64,
    /// 0-based index of the month that gains a day in leap years.
    leap_month: usize,
    /// `prefix[k]` = leap years in `[0, k)` for `k` in `0..=cycle_years`.
    prefix: Vec<i64>,
}

impl LeapRule {
    /// Build a rule from terms; divisors below 1 are ignored.
    pub fn new(terms: &[LeapTerm], leap_month: usize) -> Self {
        let mut terms: Vec<LeapTerm> = terms.iter().copied().filter(|t| t.every >= 1).collect();
        terms.sort_by(|a, b| b.every.cmp(&a.every));
        let cycle_years = terms.iter().fold(1, |acc, t| lcm(acc, t.every));

        let mut rule = Self {
            terms,
            cycle_years,
            leap_month,
            prefix: Vec::with_capacity(cycle_years as usize + 1),
        };
        let mut count = 0;
        rule.prefix.push(0);
        for year in 0..cycle_years {
            if rule.is_leap(year) {
                count += 1;
            }
            rule.prefix.push(count);
        }
        rule
    }

    /// One leap day every `years` years (Julian style).
    pub fn every(years: i64, leap_month: usize) -> Self {
        Self::new(&[LeapTerm { every: years, leap: true }], leap_month)
    }

    /// 400-year cycle with 97 leap days: every 4th year except centuries
    /// not divisible by 400.
    pub fn gregorian(leap_month: usize) -> Self {
        Self::new(
            &[
                LeapTerm { every: 400, leap: true },
                LeapTerm { every: 100, leap: false },
                LeapTerm { every: 4, leap: true },
            ],
            leap_month,
        )
    }

    /// Leap test on an astronomical year (year 0 exists).
    pub fn is_leap(&self, year: i64) -> bool {
        self.terms
            .iter()
            .find(|t| year.rem_euclid(t.every) == 0)
            .map(|t| t.leap)
            .unwrap_or(false)
    }

    pub fn cycle_years(&self) -> i64 {
        self.cycle_years
    }

    pub fn cycle_leap_days(&self) -> i64 {
        self.prefix[self.cycle_years as usize]
    }

    pub fn leap_month(&self) -> usize {
        self.leap_month
    }

    /// Number of leap years in `[0, year)`; negative for years before 0.
    pub fn leap_years_before(&self, year: i64) -> i64 {
        let cycles = year.div_euclid(self.cycle_years);
        let rest = year.rem_euclid(self.cycle_years) as usize;
        cycles * self.cycle_leap_days() + self.prefix[rest]
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn lcm(a: i64, b: i64) -> i64 {
    a / gcd(a, b) * b
}
