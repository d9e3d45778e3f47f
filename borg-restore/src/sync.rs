//! Reconciling the index with the repository's archive set.

use std::collections::HashSet;
use std::time::Instant;

use anyhow::{Context, Result};
use borg_restore_core::{ArchiveName, ArchiveSource, ListingLine};
use borg_restore_db::{Store, TableStrategy};
use tracing::info;

/// Brings the store in line with the archive source: vanished archives
/// are dropped, new ones are ingested. Every archive is committed
/// atomically; a failure mid-stream leaves it unseen so the next update
/// retries it.
pub struct Synchronizer<'a> {
    store: &'a Store,
    source: &'a dyn ArchiveSource,
    strategy: TableStrategy,
}

impl<'a> Synchronizer<'a> {
    pub fn new(store: &'a Store, source: &'a dyn ArchiveSource, strategy: TableStrategy) -> Self {
        Self {
            store,
            source,
            strategy,
        }
    }

    /// Removals first, then additions in the order the source lists
    /// them. Unchanged archives are never touched, so an update against
    /// an unchanged repository is a no-op.
    pub fn update(&self) -> Result<()> {
        let source_archives = self
            .source
            .list_archives()
            .context("Couldn't enumerate repository archives")?;
        let known = self.store.archive_names()?;

        let source_set: HashSet<&ArchiveName> = source_archives.iter().collect();
        let known_set: HashSet<&ArchiveName> = known.iter().collect();

        for archive in known.iter().filter(|a| !source_set.contains(*a)) {
            info!(archive = archive.as_str(), "Removing vanished archive");
            self.store
                .transaction::<_, anyhow::Error>(|store| Ok(store.remove_archive(archive)?))?;
            self.store.compact()?;
        }

        for archive in source_archives.iter().filter(|a| !known_set.contains(*a)) {
            self.ingest(archive)
                .with_context(|| format!("Couldn't index archive '{archive}'"))?;
            self.store.compact()?;
        }

        info!(
            archives = source_archives.len(),
            paths = self.store.row_count()?,
            "Index up to date"
        );
        Ok(())
    }

    /// Ingest one new archive within a single transaction.
    fn ingest(&self, archive: &ArchiveName) -> Result<()> {
        let started = Instant::now();
        let paths = self.store.transaction::<_, anyhow::Error>(|store| {
            store.add_archive(archive)?;
            let mut table = self.strategy.build(archive.clone());
            let mut paths: u64 = 0;
            self.source.list_archive(archive, &mut |line| {
                // Lines that do not look like a listing entry are skipped.
                if let Some(entry) = ListingLine::parse(line) {
                    table.add_path(store, &entry.path, entry.mtime)?;
                    paths += 1;
                }
                Ok(())
            })?;
            table.flush(store)?;
            Ok(paths)
        })?;
        info!(
            archive = archive.as_str(),
            paths,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Indexed archive"
        );
        Ok(())
    }
}
