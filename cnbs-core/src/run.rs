//! Forecast-run identifiers and the six-hourly run cycle.
//!
//! A run is identified by the integer `YYYYMMDDHH` of its initialization time,
//! where `HH` is one of the cycle hours 00, 06, 12 or 18. The cycle is a
//! four-state ring:
//!
//! ```text
//! 00 -> 06 -> 12 -> 18 -> 00 (next day)
//! ```

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Hours at which forecast runs are initialized.
pub const CYCLE_HOURS: [u32; 4] = [0, 6, 12, 18];

/// A validated `YYYYMMDDHH` forecast-run identifier.
///
/// Ordering follows the integer, which is also chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RunId(i64);

impl RunId {
    /// Validate a raw `YYYYMMDDHH` integer whose hour is a cycle hour.
    pub fn new(raw: i64) -> Result<Self> {
        let run = Self::any_hour(raw)?;
        if !run.is_cycle_hour() {
            return Err(Error::InvalidRun(raw));
        }
        Ok(run)
    }

    /// Validate a raw `YYYYMMDDHH` integer with any hour 00-23.
    ///
    /// Runs recorded by other producers may sit off the cycle; [`RunId::next`]
    /// still advances them.
    pub fn any_hour(raw: i64) -> Result<Self> {
        if !(1_000_000..=9_999_123_123).contains(&raw) {
            return Err(Error::InvalidRun(raw));
        }
        let year = (raw / 1_000_000) as i32;
        let month = (raw / 10_000 % 100) as u32;
        let day = (raw / 100 % 100) as u32;
        let hour = (raw % 100) as u32;
        if hour > 23 || NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(Error::InvalidRun(raw));
        }
        Ok(Self(raw))
    }

    /// Build a run from a calendar date and a cycle hour.
    pub fn from_parts(date: NaiveDate, hour: u32) -> Result<Self> {
        let raw = i64::from(date.year()) * 1_000_000
            + i64::from(date.month()) * 10_000
            + i64::from(date.day()) * 100
            + i64::from(hour);
        if !(1..=9999).contains(&date.year()) || !CYCLE_HOURS.contains(&hour) {
            return Err(Error::InvalidRun(raw));
        }
        Ok(Self(raw))
    }

    /// Build a run from its initialization time, which must fall exactly on a cycle hour.
    pub fn from_datetime(datetime: NaiveDateTime) -> Result<Self> {
        let run = Self::from_parts(datetime.date(), datetime.hour())?;
        if datetime.minute() != 0 || datetime.second() != 0 || datetime.nanosecond() != 0 {
            return Err(Error::InvalidRun(run.0));
        }
        Ok(run)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        let year = (self.0 / 1_000_000) as i32;
        let month = (self.0 / 10_000 % 100) as u32;
        let day = (self.0 / 100 % 100) as u32;
        // Checked on construction.
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    pub fn hour(&self) -> u32 {
        (self.0 % 100) as u32
    }

    /// Whether the hour is one of [`CYCLE_HOURS`].
    pub fn is_cycle_hour(&self) -> bool {
        CYCLE_HOURS.contains(&self.hour())
    }

    /// Initialization time of the run.
    pub fn datetime(&self) -> NaiveDateTime {
        self.date()
            .and_hms_opt(self.hour(), 0, 0)
            .unwrap_or_default()
    }

    /// `MM-DD-YYYY HH`, the form used when announcing which run to fetch.
    pub fn label(&self) -> String {
        format!("{} {:02}", self.date().format("%m-%d-%Y"), self.hour())
    }

    /// The next run on the cycle.
    ///
    /// Off-cycle hours count as 00 and advance to 06 of the same day. Only fails past the last representable day (9999-12-31 18Z).
    pub fn next(&self) -> Result<RunId> {
        let date = self.date();
        let (date, hour) = match self.hour() {
            18 => (date.succ_opt().ok_or(Error::InvalidRun(self.0))?, 0),
            12 => (date, 18),
            6 => (date, 12),
            _ => (date, 6),
        };
        Self::from_parts(date, hour)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

impl FromStr for RunId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::UnparsableRun(s.to_string()))?;
        Self::new(raw)
    }
}

impl TryFrom<i64> for RunId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<RunId> for i64 {
    fn from(run: RunId) -> i64 {
        run.0
    }
}

/// Next run to fetch after the most recent stored one.
///
/// Fails with [`Error::EmptyStore`] when nothing has been stored yet; the
/// caller has to seed the first run itself.
pub fn next_run(last: Option<RunId>) -> Result<RunId> {
    match last {
        Some(run) => run.next(),
        None => Err(Error::EmptyStore),
    }
}
