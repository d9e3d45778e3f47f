// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use borg_restore_core::ArchiveName;
use tracing::debug;

use crate::connection::Store;
use crate::error::Result;
use crate::table::PathTimeTable;

/// Write-through path table with an ancestor-chain cache.
///
/// Every entry is upserted along with all of its ancestors, skipping
/// writes the cache proves redundant. The cache holds the last written
/// mtime for the ancestors of the current position and is invalidated
/// when the listing leaves a subtree, so memory stays O(depth) on the
/// near-DFS ordering borg emits. Out-of-order input only costs extra
/// store calls, never correctness: the store upsert keeps the maximum.
pub struct DirectTable {
    archive: ArchiveName,
    cache: HashMap<String, i64>,
    current_path: String,
    paths_seen: u64,
    potential_calls: u64,
    store_calls: u64,
}

impl DirectTable {
    pub fn new(archive: ArchiveName) -> Self {
        Self {
            archive,
            cache: HashMap::new(),
            current_path: String::new(),
            paths_seen: 0,
            potential_calls: 0,
            store_calls: 0,
        }
    }
}

/// `"a/b/c"` → `"a"`, `"a/b"`, `"a/b/c"`.
fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.char_indices()
        .filter_map(|(i, c)| (c == '/').then(|| &path[..i]))
        .chain(std::iter::once(path))
}

/// Whether `ancestor` is `path` itself or a path prefix of it.
fn is_ancestor_of(ancestor: &str, path: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

impl PathTimeTable for DirectTable {
    fn add_path(&mut self, store: &Store, path: &str, mtime: i64) -> Result<()> {
        self.paths_seen += 1;
        if path == "." {
            return Ok(());
        }

        // Leaving a subtree: cached entries for ancestors of the previous
        // position that do not cover the new path will not be revisited.
        let cache = &mut self.cache;
        for stale in ancestors(&self.current_path) {
            if !is_ancestor_of(stale, path) {
                cache.remove(stale);
            }
        }

        for ancestor in ancestors(path) {
            self.potential_calls += 1;
            match self.cache.get(ancestor) {
                Some(&written) if written >= mtime => {}
                _ => {
                    store.upsert_path(&self.archive, ancestor, mtime)?;
                    self.cache.insert(ancestor.to_string(), mtime);
                    self.store_calls += 1;
                }
            }
        }

        self.current_path = path.to_string();
        Ok(())
    }

    /// Nothing is buffered; this only reports cache effectiveness.
    fn flush(&mut self, _store: &Store) -> Result<()> {
        debug!(
            archive = self.archive.as_str(),
            paths = self.paths_seen,
            potential_calls = self.potential_calls,
            store_calls = self.store_calls,
            "Direct path table statistics"
        );
        Ok(())
    }
}
