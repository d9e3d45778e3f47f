// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Capability traits for the backup repository.
//!
//! The index never reads repository data itself; everything goes through
//! an [`ArchiveSource`] (enumerate archives, stream one archive's file
//! listing) and an [`Extractor`] (restore a path into the current working
//! directory). The borg-backed implementations live in the
//! `borg-restore-borg` crate; tests substitute in-memory fakes.

use std::process::ExitStatus;

use crate::archive_name::ArchiveName;

/// Boxed error used to carry a consumer failure out of a listing stream.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from the archive source or extractor.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// Subprocess could not be started
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while talking to the subprocess
    #[error("I/O error while reading from `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Subprocess exited with a non-zero status
    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: ExitStatus,
    },

    /// The listing consumer aborted the stream
    #[error("Listing consumer failed: {0}")]
    Sink(#[source] BoxError),

    /// The source produced an archive name that fails untainting
    #[error(transparent)]
    InvalidName(#[from] crate::error::Error),
}

/// Receiver for the lines of one archive listing.
///
/// Returning `Err` aborts the stream; the error is handed back as
/// [`SourceError::Sink`].
pub type LineSink<'a> = &'a mut dyn FnMut(&str) -> Result<(), BoxError>;

/// Enumerates archives and streams their file listings.
pub trait ArchiveSource {
    /// Names of all archives currently in the repository.
    fn list_archives(&self) -> Result<Vec<ArchiveName>, SourceError>;

    /// Stream the per-file listing of one archive, line by line.
    fn list_archive(&self, name: &ArchiveName, sink: LineSink<'_>) -> Result<(), SourceError>;
}

/// Restores a path from an archive into the current working directory.
pub trait Extractor {
    /// Extract `path` from `archive`, stripping the first
    /// `strip_components` path components.
    fn extract(
        &self,
        strip_components: usize,
        archive: &ArchiveName,
        path: &str,
    ) -> Result<(), SourceError>;
}
