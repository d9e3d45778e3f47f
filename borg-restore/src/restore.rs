//! Placing restored files at their destination.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use borg_restore_core::{ArchiveName, Extractor};
use tracing::{debug, info};

/// Restore `path` from `archive` into `destination`.
///
/// The destination directory is created if missing and becomes the
/// process's working directory; the extractor writes relative to it.
/// Whatever currently sits at `basename(path)` inside the destination is
/// removed first so the extraction never merges into stale state.
pub fn restore(
    extractor: &dyn Extractor,
    archive: &ArchiveName,
    path: &str,
    destination: &Path,
) -> Result<()> {
    info!(
        path,
        archive = archive.as_str(),
        destination = %destination.display(),
        "Restoring"
    );
    fs::create_dir_all(destination).with_context(|| {
        format!(
            "Couldn't create destination directory '{}'",
            destination.display()
        )
    })?;
    env::set_current_dir(destination)
        .with_context(|| format!("Couldn't change into '{}'", destination.display()))?;

    let target = path.rsplit('/').next().unwrap_or(path);
    remove_stale(Path::new(target))?;

    let strip_components = path.matches('/').count();
    extractor.extract(strip_components, archive, path)?;
    Ok(())
}

fn remove_stale(target: &Path) -> Result<()> {
    // symlink_metadata: a stale symlink must be removed, not followed.
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => {
            debug!(target = %target.display(), "Removing stale directory");
            fs::remove_dir_all(target)
                .with_context(|| format!("Couldn't remove '{}'", target.display()))
        }
        Ok(_) => {
            debug!(target = %target.display(), "Removing stale file");
            fs::remove_file(target)
                .with_context(|| format!("Couldn't remove '{}'", target.display()))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Couldn't inspect '{}'", target.display()))
        }
    }
}
