// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Shared domain types and parsers for borg-restore.
//!
//! This crate holds everything the other crates agree on: validated
//! archive names, the borg listing line format, age specifications, and
//! the capability traits for talking to a backup repository.
//!
//! **Architecture**: this is the vocabulary layer; it has no I/O of its
//! own apart from the trait definitions in [`source`].

mod archive_name;
mod error;
pub mod listing;
pub mod source;
pub mod timespec;
mod untaint;

pub use archive_name::ArchiveName;
pub use error::{Error, Result};
pub use listing::ListingLine;
pub use source::{ArchiveSource, BoxError, Extractor, LineSink, SourceError};
pub use timespec::parse_timespec;
pub use untaint::untaint_path;
