//! SQL schema for the forecast cache table.
//!
//! One row per forecast key. The composite primary key on the first six
//! columns is what enforces uniqueness; it also serves the point lookups and,
//! because it leads with `cfs_run`, the latest-run aggregate.

use crate::error::{CacheError, Result};
use rusqlite::Connection;

/// Table used when none is configured.
pub const DEFAULT_TABLE: &str = "cfs_forecast_data";

/// Columns the cache reads and writes, in key order followed by the value.
pub const COLUMNS: [&str; 7] = [
    "cfs_run",
    "year",
    "month",
    "lake",
    "surface_type",
    "component",
    "value_mm",
];

/// Check that `table` is a plain identifier safe to interpolate into SQL.
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_start
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !table.to_ascii_lowercase().starts_with("sqlite_")
    {
        Ok(())
    } else {
        Err(CacheError::InvalidTable(table.to_string()))
    }
}

/// Returns the CREATE statement for `table`. Safe to apply repeatedly.
///
/// `table` must already have passed [`validate_table_name`].
pub fn create_schema(table: &str) -> String {
    format!(
        r#"
    CREATE TABLE IF NOT EXISTS {table} (
        cfs_run INTEGER NOT NULL,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
        lake TEXT NOT NULL,
        surface_type TEXT NOT NULL,
        component TEXT NOT NULL,
        value_mm REAL NOT NULL,
        PRIMARY KEY (cfs_run, year, month, lake, surface_type, component)
    );
    "#
    )
}

/// Fail with [`CacheError::SchemaMismatch`] if `table` lacks any cache column.
pub fn verify_schema(conn: &Connection, table: &str) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let missing: Vec<String> = COLUMNS
        .iter()
        .filter(|column| !present.iter().any(|p| p.eq_ignore_ascii_case(column)))
        .map(|column| column.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CacheError::SchemaMismatch {
            table: table.to_string(),
            missing,
        })
    }
}
