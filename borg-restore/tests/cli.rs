//! Binary-level tests.
//!
//! These run the real executable with the cache and config redirected to
//! temporary directories; nothing here needs borg installed.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with config and cache isolated under a temp directory.
fn isolated(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("borg-restore").unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!("cache_base = {:?}\n", temp.path().join("cache")),
    )
    .unwrap();
    cmd.env("BORG_RESTORE_CONFIG", &config_path);
    cmd
}

#[test]
fn test_help() {
    Command::cargo_bin("borg-restore")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--update-cache"))
        .stdout(predicate::str::contains("--time"));
}

#[test]
fn test_no_arguments_is_an_error() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No path given"));
}

#[test]
fn test_invalid_timespec_fails_fast() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .args(["-t", "5sec", "/etc/fstab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time specification"));
}

#[test]
fn test_lookup_in_empty_index_warns_and_succeeds() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .arg("/etc/fstab")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not found in any archive"));
}

#[test]
fn test_lookup_creates_cache_layout() {
    let temp = TempDir::new().unwrap();
    isolated(&temp).arg("/etc/fstab").assert().success();
    assert!(temp.path().join("cache/v2/archives.db").is_file());
}

#[test]
fn test_list_prints_matching_archives() {
    let temp = TempDir::new().unwrap();
    // Seed the index the binary will open.
    let db_dir = temp.path().join("cache/v2");
    std::fs::create_dir_all(&db_dir).unwrap();
    {
        let store = borg_restore_db::Store::open(db_dir.join("archives.db"), 10).unwrap();
        let archive = borg_restore_core::ArchiveName::new("seed-1").unwrap();
        store.add_archive(&archive).unwrap();
        store.upsert_path(&archive, "etc/fstab", 1_000_000).unwrap();
    }

    isolated(&temp)
        .args(["--list", "/etc/fstab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed-1"));
}

#[test]
fn test_broken_config_is_a_fatal_error() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(&config_path, "repository = [not toml").unwrap();

    Command::cargo_bin("borg-restore")
        .unwrap()
        .env("BORG_RESTORE_CONFIG", &config_path)
        .arg("/etc/fstab")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't parse config file"));
}

#[test]
fn test_time_and_archive_conflict() {
    let temp = TempDir::new().unwrap();
    isolated(&temp)
        .args(["-t", "5d", "-a", "a1", "/etc/fstab"])
        .assert()
        .failure();
}
