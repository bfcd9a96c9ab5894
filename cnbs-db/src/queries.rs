//! Reads and writes against the forecast table.
//!
//! Each method is one call to [`ForecastCache::with_connection`] and, for
//! writes, one `IMMEDIATE` transaction, so the write lock is taken up front
//! and released when the call returns.

use crate::error::{CacheError, Result};
use crate::models::{ForecastKey, ForecastRecord, LoadSummary, StoredRow};
use crate::ForecastCache;
use cnbs_core::RunId;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

impl ForecastCache {
    // ───────────────────── Writes ─────────────────────

    /// Store one value. Fails with [`CacheError::DuplicateKey`] if the key exists.
    pub fn put(&self, record: &ForecastRecord) -> Result<()> {
        self.with_connection(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            insert(&tx, &self.table, record)?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Store many values atomically.
    ///
    /// If any key already exists (or repeats within `records`) nothing is
    /// written and the first offending key is reported.
    pub fn put_all(&self, records: &[ForecastRecord]) -> Result<usize> {
        self.with_connection(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            for record in records {
                insert(&tx, &self.table, record)?;
            }
            tx.commit()?;
            log::info!("cache: stored {} records in {}", records.len(), self.table);
            Ok(records.len())
        })
    }

    /// Store the values whose keys are not present yet, leaving existing rows as they are.
    ///
    /// Re-delivering the same records is a no-op, so resumed ingestion can
    /// replay them safely.
    pub fn insert_missing(&self, records: &[ForecastRecord]) -> Result<LoadSummary> {
        self.with_connection(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut summary = LoadSummary::default();
            {
                let mut stmt = tx.prepare(&format!(
                    "INSERT OR IGNORE INTO {} (cfs_run, year, month, lake, surface_type, component, value_mm)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    self.table
                ))?;
                for record in records {
                    if stmt.execute(record_params(record)?)? == 1 {
                        summary.inserted += 1;
                    } else {
                        summary.skipped += 1;
                    }
                }
            }
            tx.commit()?;
            log::info!(
                "cache: inserted {} records into {}, skipped {} already present",
                summary.inserted,
                self.table,
                summary.skipped
            );
            Ok(summary)
        })
    }

    // ───────────────────── Reads ─────────────────────

    /// Value for an exact key, `None` when nothing is stored under it.
    pub fn get(&self, key: &ForecastKey) -> Result<Option<f64>> {
        self.with_connection(|conn| {
            let value = conn
                .query_row(
                    &format!(
                        "SELECT value_mm FROM {}
                         WHERE cfs_run = ?1 AND year = ?2 AND month = ?3
                           AND lake = ?4 AND surface_type = ?5 AND component = ?6",
                        self.table
                    ),
                    params![
                        key.run.value(),
                        key.period.year(),
                        key.period.month(),
                        key.lake.as_str(),
                        key.surface_type.as_str(),
                        key.component.as_str(),
                    ],
                    |row| row.get::<_, f64>(0),
                )
                .optional()?;
            if value.is_none() {
                log::debug!("cache: no value for {}", key);
            }
            Ok(value)
        })
    }

    /// Most recent run stored, `None` for an empty cache.
    pub fn latest_run(&self) -> Result<Option<RunId>> {
        self.with_connection(|conn| {
            let raw: Option<i64> = conn.query_row(
                &format!("SELECT MAX(cfs_run) FROM {}", self.table),
                [],
                |row| row.get(0),
            )?;
            let run = raw.map(RunId::any_hour).transpose()?;
            log::debug!("cache: latest run in {} is {:?}", self.table, run);
            Ok(run)
        })
    }

    /// The run to fetch after the latest stored one.
    ///
    /// Fails with [`CacheError::EmptyStore`] when the cache has no rows.
    pub fn next_run(&self) -> Result<RunId> {
        let next = cnbs_core::next_run(self.latest_run()?)?;
        log::info!("cache: next run is {} ({})", next, next.label());
        Ok(next)
    }

    /// Distinct runs stored, oldest first.
    pub fn runs(&self) -> Result<Vec<RunId>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT DISTINCT cfs_run FROM {} ORDER BY cfs_run",
                self.table
            ))?;
            let raw = stmt
                .query_map([], |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            raw.into_iter()
                .map(|r| RunId::any_hour(r).map_err(CacheError::from))
                .collect()
        })
    }

    /// Every record of one run, ordered by year, month, lake, surface type, component.
    pub fn query_run(&self, run: RunId) -> Result<Vec<ForecastRecord>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT cfs_run, year, month, lake, surface_type, component, value_mm
                 FROM {}
                 WHERE cfs_run = ?1
                 ORDER BY year, month, lake, surface_type, component",
                self.table
            ))?;
            let rows = stmt
                .query_map(params![run.value()], |row| {
                    Ok(StoredRow {
                        run: row.get(0)?,
                        year: row.get(1)?,
                        month: row.get(2)?,
                        lake: row.get(3)?,
                        surface_type: row.get(4)?,
                        component: row.get(5)?,
                        value_mm: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let records = rows
                .into_iter()
                .map(|row| ForecastRecord::try_from(row).map_err(CacheError::from))
                .collect::<Result<Vec<_>>>()?;
            log::debug!("cache: query_run {} returned {} records", run, records.len());
            Ok(records)
        })
    }

    /// Number of stored rows.
    pub fn len(&self) -> Result<usize> {
        self.with_connection(|conn| {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", self.table),
                [],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

type RecordParams = (i64, i32, u32, &'static str, &'static str, &'static str, f64);

/// Bind values for one row. Only cycle-hour runs and finite values are written.
fn record_params(record: &ForecastRecord) -> Result<RecordParams> {
    let key = &record.key;
    if !key.run.is_cycle_hour() {
        return Err(cnbs_core::Error::InvalidRun(key.run.value()).into());
    }
    if !record.value_mm.is_finite() {
        return Err(CacheError::NonFiniteValue {
            key: *key,
            value: record.value_mm,
        });
    }
    Ok((
        key.run.value(),
        key.period.year(),
        key.period.month(),
        key.lake.as_str(),
        key.surface_type.as_str(),
        key.component.as_str(),
        record.value_mm,
    ))
}

fn insert(conn: &Connection, table: &str, record: &ForecastRecord) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (cfs_run, year, month, lake, surface_type, component, value_mm)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            table
        ),
        record_params(record)?,
    )
    .map_err(|err| duplicate_or(err, &record.key))?;
    Ok(())
}

/// Map a primary-key violation to [`CacheError::DuplicateKey`].
fn duplicate_or(err: rusqlite::Error, key: &ForecastKey) -> CacheError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            CacheError::DuplicateKey(*key)
        }
        _ => CacheError::Sqlite(err),
    }
}
