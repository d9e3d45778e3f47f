// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Archive enumeration and listing streams.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

use borg_restore_core::{ArchiveName, ArchiveSource, LineSink, SourceError};
use tracing::{debug, error};

use crate::{display_command, location, BORG_BIN};

/// [`ArchiveSource`] backed by `borg list` subprocesses.
pub struct BorgArchiveSource {
    repository: String,
}

impl BorgArchiveSource {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
        }
    }
}

fn list_archives_args(repository: &str) -> Vec<String> {
    vec!["list".into(), repository.into()]
}

fn list_archive_args(location: &str) -> Vec<String> {
    vec![
        "list".into(),
        "--format".into(),
        "{mtime} {path}{NL}".into(),
        location.into(),
    ]
}

impl ArchiveSource for BorgArchiveSource {
    /// Enumerate archives: first whitespace-delimited token per line of
    /// `borg list <repo>`.
    fn list_archives(&self) -> Result<Vec<ArchiveName>, SourceError> {
        let args = list_archives_args(&self.repository);
        let command = display_command(&args);
        debug!(%command, "Enumerating archives");

        let output = Command::new(BORG_BIN)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SourceError::Spawn {
                command: command.clone(),
                source: e,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(%command, "borg failed: {}", stderr.trim_end());
            return Err(SourceError::Failed {
                command,
                status: output.status,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut archives = Vec::new();
        for line in stdout.lines() {
            if let Some(token) = line.split_whitespace().next() {
                archives.push(ArchiveName::new(token)?);
            }
        }
        Ok(archives)
    }

    /// Stream one archive's per-file listing into `sink`, line by line.
    ///
    /// borg's stderr is inherited so repository warnings reach the user
    /// directly. A sink error kills the subprocess and aborts the stream.
    fn list_archive(&self, name: &ArchiveName, sink: LineSink<'_>) -> Result<(), SourceError> {
        let args = list_archive_args(&location(&self.repository, name));
        let command = display_command(&args);
        debug!(%command, "Streaming archive listing");

        let mut child = Command::new(BORG_BIN)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| SourceError::Spawn {
                command: command.clone(),
                source: e,
            })?;

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(source) => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(SourceError::Io { command, source });
                    }
                };
                if let Err(err) = sink(&line) {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SourceError::Sink(err));
                }
            }
        }

        let status = child.wait().map_err(|source| SourceError::Io {
            command: command.clone(),
            source,
        })?;
        if !status.success() {
            return Err(SourceError::Failed { command, status });
        }
        Ok(())
    }
}
