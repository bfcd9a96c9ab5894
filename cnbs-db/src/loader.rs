//! CSV loading for the forecast cache.
//!
//! # CSV Format
//!
//! Headers are required and matched by name:
//!
//! ```text
//! cfs_run,year,month,lake,surface_type,component,value_mm
//! 2024010100,2024,1,erie,lake,evaporation,35.2
//! ```
//!
//! Every row must be valid; a malformed row fails the whole load and nothing
//! is written.

use crate::error::{CacheError, Result};
use crate::models::{ForecastRecord, LoadSummary, StoredRow};
use crate::ForecastCache;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    cfs_run: i64,
    year: i32,
    month: u32,
    lake: String,
    surface_type: String,
    component: String,
    value_mm: f64,
}

impl From<CsvRow> for StoredRow {
    fn from(row: CsvRow) -> Self {
        StoredRow {
            run: row.cfs_run,
            year: row.year,
            month: row.month,
            lake: row.lake,
            surface_type: row.surface_type,
            component: row.component,
            value_mm: row.value_mm,
        }
    }
}

/// Parse forecast records from CSV text.
pub fn parse_records(csv_data: &str) -> Result<Vec<ForecastRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let mut records = Vec::new();
    for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let record = ForecastRecord::try_from(StoredRow::from(row)).map_err(|err| {
            log::warn!("loader: rejecting data row {}: {}", line + 1, err);
            CacheError::from(err)
        })?;
        records.push(record);
    }
    Ok(records)
}

impl ForecastCache {
    /// Load forecast records from CSV text.
    ///
    /// With `skip_existing` keys already in the cache are left as they are
    /// and counted as skipped; without it any existing key fails the load
    /// with [`CacheError::DuplicateKey`] and nothing is written.
    pub fn load_csv(&self, csv_data: &str, skip_existing: bool) -> Result<LoadSummary> {
        let records = parse_records(csv_data)?;
        let summary = if skip_existing {
            self.insert_missing(&records)?
        } else {
            LoadSummary {
                inserted: self.put_all(&records)?,
                skipped: 0,
            }
        };
        log::info!(
            "loader: loaded {} forecast records, skipped {}",
            summary.inserted,
            summary.skipped
        );
        Ok(summary)
    }
}
