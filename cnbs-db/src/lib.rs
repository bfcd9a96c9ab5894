//! SQLite-backed cache of forecast net basin supply components.
//!
//! Values are keyed by (run, year, month, lake, surface type, component) and
//! the cache grows by insertion only. Writing a key that is already present is
//! rejected with [`CacheError::DuplicateKey`]; [`ForecastCache::insert_missing`]
//! is the idempotent alternative for re-delivered data.
//!
//! # Connections
//!
//! A file-backed cache holds only its path. Every operation opens its own
//! connection, runs one transaction and closes it again, so no connection or
//! cursor outlives a call and independent processes can share the file. An
//! in-memory cache has nothing to reopen and instead shares one connection
//! behind a mutex.
//!
//! # Usage
//!
//! ```rust
//! use cnbs_core::{Component, Lake, Period, RunId, SurfaceType};
//! use cnbs_db::{ForecastCache, ForecastKey, ForecastRecord};
//!
//! let cache = ForecastCache::in_memory().unwrap();
//! let key = ForecastKey::new(
//!     RunId::new(2023123118).unwrap(),
//!     Period::new(2024, 1).unwrap(),
//!     Lake::Erie,
//!     SurfaceType::Lake,
//!     Component::Evaporation,
//! );
//! cache.put(&ForecastRecord::new(key, 12.5)).unwrap();
//!
//! assert_eq!(cache.get(&key).unwrap(), Some(12.5));
//! assert_eq!(cache.next_run().unwrap(), RunId::new(2024010100).unwrap());
//! ```

pub mod error;
mod loader;
pub mod models;
mod queries;
pub mod schema;

pub use error::{CacheError, Result};
pub use loader::parse_records;
pub use models::{ForecastKey, ForecastRecord, LoadSummary};

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long a file-backed operation waits for another writer's lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
enum Store {
    File(PathBuf),
    Memory(Arc<Mutex<Connection>>),
}

/// Persistent store of forecast values.
///
/// Cheap to clone; clones address the same store.
#[derive(Debug, Clone)]
pub struct ForecastCache {
    store: Store,
    table: String,
}

impl ForecastCache {
    /// Open (creating if needed) a cache file using the default table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_table(path, schema::DEFAULT_TABLE)
    }

    /// Open (creating if needed) a cache file using `table`.
    ///
    /// The table is created only if absent; existing rows are never touched.
    pub fn open_with_table<P: AsRef<Path>>(path: P, table: &str) -> Result<Self> {
        schema::validate_table_name(table)?;
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            log::info!("cache: creating new database {}", path.display());
        }
        log::info!("cache: opening {} table {}", path.display(), table);
        let cache = Self {
            store: Store::File(path),
            table: table.to_string(),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// A cache that lives only as long as this value and its clones.
    pub fn in_memory() -> Result<Self> {
        Self::in_memory_with_table(schema::DEFAULT_TABLE)
    }

    pub fn in_memory_with_table(table: &str) -> Result<Self> {
        schema::validate_table_name(table)?;
        let conn = Connection::open_in_memory()?;
        let cache = Self {
            store: Store::Memory(Arc::new(Mutex::new(conn))),
            table: table.to_string(),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Name of the backing table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Path of the backing file, `None` for an in-memory cache.
    pub fn location(&self) -> Option<&Path> {
        match &self.store {
            Store::File(path) => Some(path.as_path()),
            Store::Memory(_) => None,
        }
    }

    fn init_schema(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(&schema::create_schema(&self.table))?;
            schema::verify_schema(conn, &self.table)
        })
    }

    /// Run `f` against a connection scoped to this call.
    fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        match &self.store {
            Store::File(path) => {
                let mut conn = Connection::open(path)?;
                conn.busy_timeout(BUSY_TIMEOUT)?;
                f(&mut conn)
            }
            Store::Memory(shared) => {
                let mut conn = shared.lock().map_err(|_| CacheError::LockPoisoned)?;
                f(&mut *conn)
            }
        }
    }
}
