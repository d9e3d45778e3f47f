// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types for index operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during index operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open the index database with context
    #[error("Failed to open index database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Archive is already present in the index
    #[error("Archive already indexed: {0}")]
    ArchiveExists(String),

    /// The archives table contains a name that fails untainting
    #[error("Corrupt archive name in index: {0}")]
    CorruptArchiveName(#[from] borg_restore_core::Error),
}
