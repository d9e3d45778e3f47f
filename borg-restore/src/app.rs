//! Orchestrator wiring the store, the archive source, and the extractor.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use borg_restore_borg::{BorgArchiveSource, BorgExtractor};
use borg_restore_core::{untaint_path, ArchiveName, ArchiveSource, Extractor};
use borg_restore_db::{Store, TableStrategy};
use chrono::Utc;
use tracing::debug;

use crate::config::Config;
use crate::query::{self, ArchiveMatch};
use crate::restore;
use crate::sync::Synchronizer;

/// A user-supplied path resolved for querying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPath {
    /// Absolute form, after lexical normalization
    pub absolute: String,
    /// Rewritten and stripped of the leading slash, as stored in archives
    pub archive_relative: String,
}

/// Facade owning the index and the repository capabilities.
pub struct App<S, E> {
    store: Store,
    source: S,
    extractor: E,
    config: Config,
}

impl App<BorgArchiveSource, BorgExtractor> {
    /// Open the on-disk index and wire up borg.
    pub fn open(config: Config) -> Result<Self> {
        let db_path = config.database_path()?;
        if let Some(dir) = db_path.parent() {
            ensure_private_dir(dir)?;
        }
        let store = Store::open(&db_path, config.sqlite_cache_size_mb)?;
        let source = BorgArchiveSource::new(config.repository.clone());
        let extractor = BorgExtractor::new(config.repository.clone());
        Ok(Self::new(store, source, extractor, config))
    }
}

impl<S: ArchiveSource, E: Extractor> App<S, E> {
    pub fn new(store: Store, source: S, extractor: E, config: Config) -> Self {
        Self {
            store,
            source,
            extractor,
            config,
        }
    }

    /// Synchronize the index with the repository's current archive set.
    pub fn update_cache(&self) -> Result<()> {
        let strategy = if self.config.prepare_data_in_memory {
            TableStrategy::Memory
        } else {
            TableStrategy::Direct
        };
        Synchronizer::new(&self.store, &self.source, strategy).update()
    }

    /// Untaint, absolutize, and rewrite a user-supplied path into the
    /// form stored in archives.
    pub fn resolve_path(&self, user_path: &str) -> Result<LookupPath> {
        let path = untaint_path(user_path)?;
        let absolute = absolutize(path)?;
        let rewritten = self.config.apply_rewrites(&absolute);
        let archive_relative = rewritten.trim_start_matches('/').to_string();
        if archive_relative.is_empty() {
            bail!("'{user_path}' resolves to the filesystem root");
        }
        debug!(path = user_path, absolute, archive_relative, "Resolved lookup path");
        Ok(LookupPath {
            absolute,
            archive_relative,
        })
    }

    /// All distinct versions of the path, ascending by mtime.
    pub fn find_archives(&self, lookup: &LookupPath) -> Result<Vec<ArchiveMatch>> {
        query::find_archives(&self.store, &lookup.archive_relative)
    }

    /// The newest archive whose version is older than `timespec`.
    pub fn select_archive_by_age<'a>(
        &self,
        matches: &'a [ArchiveMatch],
        timespec: &str,
    ) -> Result<Option<&'a ArchiveMatch>> {
        query::select_archive_by_age(matches, timespec, Utc::now().timestamp())
    }

    /// Restore the path from `archive` into `destination`.
    pub fn restore(
        &self,
        lookup: &LookupPath,
        archive: &ArchiveName,
        destination: &Path,
    ) -> Result<()> {
        let destination_str = destination
            .to_str()
            .context("Destination must be valid UTF-8")?;
        untaint_path(destination_str)?;
        restore::restore(
            &self.extractor,
            archive,
            &lookup.archive_relative,
            destination,
        )
    }
}

/// Create `dir` (and its parents) readable only by the owner.
fn ensure_private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .with_context(|| format!("Couldn't create cache directory '{}'", dir.display()))?;
    Ok(())
}

/// Make a path absolute against the current directory and resolve `.`
/// and `..` lexically (no symlink resolution, the path may not exist).
fn absolutize(path: &str) -> Result<String> {
    let joined = if path.starts_with('/') {
        PathBuf::from(path)
    } else {
        env::current_dir()
            .context("Couldn't determine the current directory")?
            .join(path)
    };

    let mut stack: Vec<String> = Vec::new();
    for component in joined.components() {
        match component {
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            Component::ParentDir => {
                stack.pop();
            }
            Component::Normal(part) => stack.push(part.to_string_lossy().into_owned()),
        }
    }
    Ok(format!("/{}", stack.join("/")))
}
