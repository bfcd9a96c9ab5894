//! Forecast cache keys and records.
//!
//! Structs derive `Serialize` so query results can be written out as JSON.

use cnbs_core::{Component, Lake, Period, RunId, SurfaceType};
use serde::Serialize;
use std::fmt;

/// The composite key of a cached forecast value. At most one value is stored per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ForecastKey {
    /// Forecast run the value came from.
    pub run: RunId,
    /// Calendar month the value applies to.
    pub period: Period,
    pub lake: Lake,
    pub surface_type: SurfaceType,
    pub component: Component,
}

impl ForecastKey {
    pub fn new(
        run: RunId,
        period: Period,
        lake: Lake,
        surface_type: SurfaceType,
        component: Component,
    ) -> Self {
        Self {
            run,
            period,
            lake,
            surface_type,
            component,
        }
    }
}

impl fmt::Display for ForecastKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {} {} {}/{}/{}",
            self.run, self.period, self.lake, self.surface_type, self.component
        )
    }
}

/// A cached value with its key. Values are basin depths in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRecord {
    #[serde(flatten)]
    pub key: ForecastKey,
    pub value_mm: f64,
}

impl ForecastRecord {
    pub fn new(key: ForecastKey, value_mm: f64) -> Self {
        Self { key, value_mm }
    }
}

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Rows written.
    pub inserted: usize,
    /// Rows whose key was already present and were left untouched.
    pub skipped: usize,
}

/// Row as stored, before the text columns are checked against the core types.
pub(crate) struct StoredRow {
    pub run: i64,
    pub year: i32,
    pub month: u32,
    pub lake: String,
    pub surface_type: String,
    pub component: String,
    pub value_mm: f64,
}

impl TryFrom<StoredRow> for ForecastRecord {
    type Error = cnbs_core::Error;

    fn try_from(row: StoredRow) -> Result<Self, Self::Error> {
        let key = ForecastKey {
            run: RunId::any_hour(row.run)?,
            period: Period::new(row.year, row.month)?,
            lake: row.lake.parse()?,
            surface_type: row.surface_type.parse()?,
            component: row.component.parse()?,
        };
        Ok(ForecastRecord::new(key, row.value_mm))
    }
}
