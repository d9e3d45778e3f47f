// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types for input validation.

use thiserror::Error;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced when user-supplied strings fail untainting.
#[derive(Error, Debug)]
pub enum Error {
    /// Archive name contains characters outside the whitelist
    #[error("Invalid archive name: {0:?}")]
    InvalidArchiveName(String),

    /// Path is empty or contains a NUL byte
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),
}
