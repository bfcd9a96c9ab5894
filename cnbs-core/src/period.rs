//! Calendar periods and the seconds they span.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A validated (year, month) pair.
///
/// Periods order chronologically, so they can key a `BTreeMap` or sort a
/// monthly series directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, rejecting months outside 1..=12 and non-positive years.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if year < 1
            || !(1..=12).contains(&month)
            || NaiveDate::from_ymd_opt(year, month, 1).is_none()
        {
            return Err(Error::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in this month, leap years included.
    pub fn days(&self) -> u32 {
        match self.month {
            2 if self.is_leap_year() => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Whether February of this period's year has 29 days.
    pub fn is_leap_year(&self) -> bool {
        NaiveDate::from_ymd_opt(self.year, 2, 29).is_some()
    }

    /// Seconds elapsed over the whole month.
    pub fn seconds(&self) -> i64 {
        i64::from(self.days()) * SECONDS_PER_DAY
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<NaiveDate> for Period {
    type Error = Error;

    fn try_from(date: NaiveDate) -> Result<Self> {
        Self::new(date.year(), date.month())
    }
}

/// Seconds in the given calendar month, proleptic Gregorian.
pub fn seconds_in_month(year: i32, month: u32) -> Result<i64> {
    Ok(Period::new(year, month)?.seconds())
}
