// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::SCHEMA_SQL;

/// Default SQLite page cache size in mebibytes.
pub(crate) const DEFAULT_CACHE_SIZE_MB: u32 = 100;

/// SQLite connection for the path index.
///
/// The store is owned by exactly one process at a time; there is a single
/// writer and queries never interleave with updates.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open or create the index database at `path`.
    ///
    /// `cache_size_mb` sizes the SQLite page cache; ingestion of large
    /// archives is upsert-heavy and benefits from a generous cache.
    pub fn open<P: AsRef<Path>>(path: P, cache_size_mb: u32) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };
        db.configure_pragmas(cache_size_mb)?;
        db.create_schema()?;
        debug!("Opened index database at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory index (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure_pragmas(DEFAULT_CACHE_SIZE_MB)?;
        db.create_schema()?;
        debug!("Created in-memory index database");
        Ok(db)
    }

    /// Configure SQLite pragmas for an upsert-heavy, single-writer load.
    fn configure_pragmas(&self, cache_size_mb: u32) -> Result<()> {
        // Negative cache_size means KiB rather than pages.
        self.conn.execute_batch(&format!(
            r#"
            PRAGMA cache_size = -{};
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            "#,
            i64::from(cache_size_mb) * 1024,
        ))?;
        Ok(())
    }

    /// Create the database schema.
    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// Run `f` inside a write transaction.
    ///
    /// Commits when `f` returns `Ok`; any `Err` (or a panic) rolls the
    /// transaction back before it propagates.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&Self) -> std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<Error>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| E::from(Error::Sqlite(e)))?;
        let value = f(self)?;
        tx.commit().map_err(|e| E::from(Error::Sqlite(e)))?;
        Ok(value)
    }

    /// Reclaim disk space after large churn.
    ///
    /// Must run outside any transaction; callers compact after the
    /// surrounding transaction has committed.
    pub fn compact(&self) -> Result<()> {
        debug!("Compacting index database");
        self.conn.execute_batch("VACUUM")?;
        Ok(())
    }

    /// Number of indexed paths.
    pub fn row_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from files", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
