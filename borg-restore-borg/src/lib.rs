// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! borg subprocess plumbing.
//!
//! Implements the [`ArchiveSource`] and [`Extractor`] capabilities by
//! shelling out to the `borg` binary. Nothing in here reads repository
//! data directly; borg stays responsible for the actual bytes.
//!
//! [`ArchiveSource`]: borg_restore_core::ArchiveSource
//! [`Extractor`]: borg_restore_core::Extractor

mod extract;
mod source;

pub use extract::BorgExtractor;
pub use source::BorgArchiveSource;

/// Name of the borg executable, resolved through `PATH`.
const BORG_BIN: &str = "borg";

/// Human-readable command line for error messages.
fn display_command(args: &[String]) -> String {
    let mut command = String::from(BORG_BIN);
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

/// `<repository>::<archive>` location syntax; an empty repository defers
/// to borg's `BORG_REPO` environment variable.
fn location(repository: &str, archive: &borg_restore_core::ArchiveName) -> String {
    format!("{repository}::{archive}")
}
