// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use borg_restore_core::ArchiveName;
use tracing::debug;

use crate::connection::Store;
use crate::error::Result;
use crate::table::PathTimeTable;

#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
    mtime: i64,
}

impl TreeNode {
    fn new(mtime: i64) -> Self {
        Self {
            children: BTreeMap::new(),
            mtime,
        }
    }
}

/// In-memory path table: builds the whole archive as a tree, then flushes
/// it to the store in one pass.
///
/// Insertion order does not matter; the max-mtime invariant is
/// established by construction because every node on the walk to a leaf
/// takes the maximum of its own and the incoming mtime.
pub struct MemoryTable {
    archive: ArchiveName,
    root: TreeNode,
}

impl MemoryTable {
    pub fn new(archive: ArchiveName) -> Self {
        Self {
            archive,
            root: TreeNode::default(),
        }
    }
}

impl PathTimeTable for MemoryTable {
    fn add_path(&mut self, _store: &Store, path: &str, mtime: i64) -> Result<()> {
        if path == "." {
            self.root.mtime = self.root.mtime.max(mtime);
            return Ok(());
        }
        let mut node = &mut self.root;
        for component in path.split('/').filter(|c| !c.is_empty()) {
            node = node
                .children
                .entry(component.to_string())
                .or_insert_with(|| TreeNode::new(mtime));
            node.mtime = node.mtime.max(mtime);
        }
        Ok(())
    }

    fn flush(&mut self, store: &Store) -> Result<()> {
        // Explicit stack: listings contain paths hundreds of components
        // deep, too deep to recurse over.
        let root = std::mem::take(&mut self.root);
        let mut stack: Vec<(String, TreeNode)> = root.children.into_iter().collect();
        let mut rows = 0u64;
        while let Some((path, node)) = stack.pop() {
            store.upsert_path(&self.archive, &path, node.mtime)?;
            rows += 1;
            for (component, child) in node.children {
                stack.push((format!("{path}/{component}"), child));
            }
        }
        debug!(
            archive = self.archive.as_str(),
            rows, "Flushed in-memory path table"
        );
        Ok(())
    }
}
