/// Error types for the forecast cache
use crate::models::ForecastKey;
use thiserror::Error;

/// Main error type for forecast cache operations.
///
/// A read miss is not an error: lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A record with the same composite key is already stored
    #[error("Duplicate forecast key: {0}")]
    DuplicateKey(ForecastKey),

    /// NaN or infinite value, which the table cannot hold
    #[error("Non-finite value {value} for {key}")]
    NonFiniteValue { key: ForecastKey, value: f64 },

    /// No forecast run stored to advance from
    #[error("Forecast cache is empty; an initial run must be supplied")]
    EmptyStore,

    /// Table name that is not a plain SQL identifier
    #[error("Invalid table name: {0}")]
    InvalidTable(String),

    /// Existing table lacks columns the cache needs
    #[error("Table {table} does not match the forecast schema, missing columns: {missing:?}")]
    SchemaMismatch { table: String, missing: Vec<String> },

    /// A thread panicked while holding the in-memory connection
    #[error("Forecast cache connection lock poisoned")]
    LockPoisoned,

    /// Backing store failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to parse CSV input
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Stored or supplied value that violates a core invariant
    #[error(transparent)]
    Core(cnbs_core::Error),
}

impl From<cnbs_core::Error> for CacheError {
    fn from(err: cnbs_core::Error) -> Self {
        match err {
            cnbs_core::Error::EmptyStore => CacheError::EmptyStore,
            other => CacheError::Core(other),
        }
    }
}

/// Type alias for Results using CacheError
pub type Result<T> = std::result::Result<T, CacheError>;
