// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! File extraction.

use std::process::Command;

use borg_restore_core::{ArchiveName, Extractor, SourceError};
use tracing::info;

use crate::{display_command, location, BORG_BIN};

/// [`Extractor`] backed by `borg extract`.
///
/// Extraction writes into the process's current working directory; the
/// caller is responsible for having changed into the destination first.
pub struct BorgExtractor {
    repository: String,
}

impl BorgExtractor {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
        }
    }
}

fn extract_args(location: &str, strip_components: usize, path: &str) -> Vec<String> {
    vec![
        "extract".into(),
        "--strip-components".into(),
        strip_components.to_string(),
        location.into(),
        path.into(),
    ]
}

impl Extractor for BorgExtractor {
    fn extract(
        &self,
        strip_components: usize,
        archive: &ArchiveName,
        path: &str,
    ) -> Result<(), SourceError> {
        let args = extract_args(&location(&self.repository, archive), strip_components, path);
        let command = display_command(&args);
        info!(%command, "Extracting");

        let status = Command::new(BORG_BIN)
            .args(&args)
            .status()
            .map_err(|e| SourceError::Spawn {
                command: command.clone(),
                source: e,
            })?;
        if !status.success() {
            return Err(SourceError::Failed { command, status });
        }
        Ok(())
    }
}
