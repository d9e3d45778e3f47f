//! Resolving a path to the archives that contain it.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use borg_restore_core::{parse_timespec, ArchiveName};
use borg_restore_db::Store;
use tracing::warn;

/// One archive containing the looked-up path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMatch {
    pub archive: ArchiveName,
    /// Newest mtime below the path in this archive
    pub mtime: i64,
}

/// All distinct versions of a path, ascending by mtime.
///
/// Archives recording the same mtime hold the same version of the path;
/// only the first of them (in store enumeration order) is reported. An
/// empty result is a user-visible warning, not an error.
pub fn find_archives(store: &Store, path: &str) -> Result<Vec<ArchiveMatch>> {
    let mut seen = HashSet::new();
    let mut matches: Vec<ArchiveMatch> = store
        .get_archives_for_path(path)?
        .into_iter()
        .filter_map(|(archive, mtime)| mtime.map(|mtime| ArchiveMatch { archive, mtime }))
        .filter(|candidate| seen.insert(candidate.mtime))
        .collect();
    matches.sort_by_key(|candidate| candidate.mtime);

    if matches.is_empty() {
        warn!(path, "Path not found in any archive");
    }
    Ok(matches)
}

/// The newest archive whose version is older than the given age.
///
/// Returns `None` when every version is newer; that is an empty result,
/// not an error. `timespec` failing to parse is an error.
pub fn select_archive_by_age<'a>(
    matches: &'a [ArchiveMatch],
    timespec: &str,
    now: i64,
) -> Result<Option<&'a ArchiveMatch>> {
    let seconds =
        parse_timespec(timespec).ok_or_else(|| anyhow!("Invalid time specification '{timespec}'"))?;
    let target = now - seconds as i64;
    Ok(matches.iter().rev().find(|candidate| candidate.mtime < target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(name: &str) -> ArchiveName {
        ArchiveName::new(name).unwrap()
    }

    fn populated_store() -> Store {
        let store = Store::open_memory().unwrap();
        for name in ["a", "b", "c"] {
            store.add_archive(&archive(name)).unwrap();
        }
        store
    }

    #[test]
    fn test_results_are_sorted_ascending() {
        let store = populated_store();
        store.upsert_path(&archive("a"), "foo", 300).unwrap();
        store.upsert_path(&archive("b"), "foo", 100).unwrap();
        store.upsert_path(&archive("c"), "foo", 200).unwrap();

        let matches = find_archives(&store, "foo").unwrap();
        let mtimes: Vec<i64> = matches.iter().map(|m| m.mtime).collect();
        assert_eq!(mtimes, vec![100, 200, 300]);
    }

    #[test]
    fn test_identical_mtimes_collapse_to_first_archive() {
        let store = populated_store();
        store.upsert_path(&archive("a"), "foo", 100).unwrap();
        store.upsert_path(&archive("b"), "foo", 100).unwrap();

        let matches = find_archives(&store, "foo").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].archive, archive("a"));
        assert_eq!(matches[0].mtime, 100);
    }

    #[test]
    fn test_null_mtimes_are_dropped() {
        let store = populated_store();
        store.upsert_path(&archive("b"), "foo", 100).unwrap();

        let matches = find_archives(&store, "foo").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].archive, archive("b"));
    }

    #[test]
    fn test_missing_path_yields_empty_list() {
        let store = populated_store();
        assert!(find_archives(&store, "nowhere").unwrap().is_empty());
    }

    fn sample_matches() -> Vec<ArchiveMatch> {
        [("a", 10), ("b", 50), ("c", 100)]
            .into_iter()
            .map(|(name, mtime)| ArchiveMatch {
                archive: archive(name),
                mtime,
            })
            .collect()
    }

    #[test]
    fn test_select_newest_older_than_age() {
        let matches = sample_matches();
        let selected = select_archive_by_age(&matches, "100s", 200).unwrap().unwrap();
        assert_eq!(selected.archive, archive("b"));
    }

    #[test]
    fn test_select_nothing_old_enough() {
        let matches = sample_matches();
        assert!(select_archive_by_age(&matches, "250s", 200)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_select_invalid_timespec_is_an_error() {
        let matches = sample_matches();
        assert!(select_archive_by_age(&matches, "5sec", 200).is_err());
    }
}
