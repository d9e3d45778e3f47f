// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Tests for the two ingestion strategies.
//!
//! Both variants must produce identical stored rows and both must uphold
//! the invariant that a directory's mtime is the newest mtime in its
//! subtree.

use std::collections::HashMap;

use borg_restore_core::ArchiveName;
use borg_restore_db::{DirectTable, MemoryTable, PathTimeTable, Store, TableStrategy};
use proptest::prelude::*;

fn archive(name: &str) -> ArchiveName {
    ArchiveName::new(name).unwrap()
}

/// Ingest `entries` with the given strategy into a fresh store.
fn ingest(strategy: TableStrategy, entries: &[(&str, i64)]) -> Store {
    let store = Store::open_memory().unwrap();
    let a = archive("a1");
    store.add_archive(&a).unwrap();
    let mut table = strategy.build(a);
    for (path, mtime) in entries {
        table.add_path(&store, path, *mtime).unwrap();
    }
    table.flush(&store).unwrap();
    store
}

fn stored_mtime(store: &Store, path: &str) -> Option<i64> {
    let rows = store.get_archives_for_path(path).unwrap();
    assert_eq!(rows.len(), 1);
    rows[0].1
}

/// A small boot tree, in borg's DFS-ish listing order.
const BOOT_TREE: &[(&str, i64)] = &[
    (".", 5),
    ("boot", 10),
    ("boot/grub", 20),
    ("boot/grub/grub.cfg", 8),
    ("boot/foo", 13),
    ("boot/foo/blub", 13),
    ("boot/foo/bar", 19),
];

fn check_boot_tree(store: &Store) {
    for (path, expected) in [
        ("boot", 20),
        ("boot/foo", 19),
        ("boot/foo/bar", 19),
        ("boot/foo/blub", 13),
        ("boot/grub", 20),
        ("boot/grub/grub.cfg", 8),
    ] {
        assert_eq!(stored_mtime(store, path), Some(expected), "{path}");
    }
    // The root sentinel never becomes a row, and unknown paths have no
    // version anywhere.
    assert_eq!(stored_mtime(store, "."), None);
    assert_eq!(stored_mtime(store, "lulz"), None);
    assert_eq!(store.row_count().unwrap(), 6);
}

#[test]
fn test_memory_table_aggregates_tree() {
    check_boot_tree(&ingest(TableStrategy::Memory, BOOT_TREE));
}

#[test]
fn test_direct_table_aggregates_tree() {
    check_boot_tree(&ingest(TableStrategy::Direct, BOOT_TREE));
}

#[test]
fn test_memory_table_is_order_agnostic() {
    let mut shuffled = BOOT_TREE.to_vec();
    shuffled.reverse();
    check_boot_tree(&ingest(TableStrategy::Memory, &shuffled));
}

#[test]
fn test_direct_table_survives_non_dfs_input() {
    // Revisiting a subtree evicts and repopulates the cache; the stored
    // maxima must come out the same.
    let mut shuffled = BOOT_TREE.to_vec();
    shuffled.reverse();
    check_boot_tree(&ingest(TableStrategy::Direct, &shuffled));
}

#[test]
fn test_direct_table_flush_is_idempotent() {
    let store = Store::open_memory().unwrap();
    let a = archive("a1");
    store.add_archive(&a).unwrap();
    let mut table = DirectTable::new(a);
    table.add_path(&store, "x/y", 3).unwrap();
    table.flush(&store).unwrap();
    table.flush(&store).unwrap();
    assert_eq!(stored_mtime(&store, "x"), Some(3));
}

#[test]
fn test_memory_table_flushes_deep_paths() {
    let store = Store::open_memory().unwrap();
    let a = archive("a1");
    store.add_archive(&a).unwrap();
    let mut table = MemoryTable::new(a);
    let deep = (0..400).map(|_| "d").collect::<Vec<_>>().join("/");
    table.add_path(&store, &deep, 9).unwrap();
    table.flush(&store).unwrap();
    assert_eq!(stored_mtime(&store, "d"), Some(9));
    assert_eq!(stored_mtime(&store, &deep), Some(9));
    assert_eq!(store.row_count().unwrap(), 400);
}

/// Strategy for a plausible archive listing: short component alphabet so
/// paths share prefixes, components above '/' in ASCII so sorting the
/// paths yields a depth-first order.
fn arb_listing() -> impl Strategy<Value = Vec<(String, i64)>> {
    let component = "[a-d]{1,2}";
    let path = proptest::collection::vec(component, 1..4).prop_map(|parts| parts.join("/"));
    proptest::collection::vec((path, -100i64..100_000), 1..40)
}

fn all_rows(store: &Store, listing: &[(String, i64)]) -> HashMap<String, i64> {
    let mut rows = HashMap::new();
    for (path, _) in listing {
        let mut prefix = String::new();
        for component in path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(component);
            if let Some(mtime) = stored_mtime(store, &prefix) {
                rows.insert(prefix.clone(), mtime);
            }
        }
    }
    rows
}

proptest! {
    /// Every stored directory mtime dominates its whole subtree, and the
    /// two strategies agree row for row.
    #[test]
    fn prop_max_mtime_invariant(listing in arb_listing()) {
        let mut sorted = listing.clone();
        sorted.sort();
        let entries: Vec<(&str, i64)> = sorted.iter().map(|(p, m)| (p.as_str(), *m)).collect();

        let memory = ingest(TableStrategy::Memory, &entries);
        let direct = ingest(TableStrategy::Direct, &entries);

        let memory_rows = all_rows(&memory, &sorted);
        let direct_rows = all_rows(&direct, &sorted);
        prop_assert_eq!(&memory_rows, &direct_rows);

        for (path, mtime) in &memory_rows {
            for (other, other_mtime) in &memory_rows {
                let below = other.strip_prefix(path.as_str())
                    .is_some_and(|rest| rest.starts_with('/'));
                if below {
                    prop_assert!(
                        mtime >= other_mtime,
                        "{} ({}) must dominate {} ({})", path, mtime, other, other_mtime
                    );
                }
            }
        }
    }
}
