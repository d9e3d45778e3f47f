use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use borg_restore::app::{App, LookupPath};
use borg_restore::cli::Cli;
use borg_restore::query::ArchiveMatch;
use borg_restore::config;
use borg_restore_core::{parse_timespec, ArchiveName};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        error!("{err:#}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Fail before any repository or index work on a bad --time.
    if let Some(spec) = &cli.time {
        if parse_timespec(spec).is_none() {
            bail!("Invalid time specification '{spec}'");
        }
    }

    let config = config::load()?;
    let app = App::open(config)?;

    if cli.update_cache {
        app.update_cache()?;
    }

    let Some(user_path) = &cli.path else {
        if cli.update_cache {
            return Ok(());
        }
        bail!("No path given; see --help");
    };

    let lookup = app.resolve_path(user_path)?;
    let matches = app.find_archives(&lookup)?;
    if matches.is_empty() {
        return Ok(());
    }

    if cli.list {
        print_matches(&matches);
        return Ok(());
    }

    let selected = if let Some(name) = &cli.archive {
        let wanted = ArchiveName::new(name.as_str())?;
        let found = matches.iter().find(|m| m.archive == wanted).with_context(|| {
            format!(
                "Archive '{wanted}' has no version of '{}'",
                lookup.archive_relative
            )
        })?;
        Some(found)
    } else if let Some(spec) = &cli.time {
        let found = app.select_archive_by_age(&matches, spec)?;
        if found.is_none() {
            warn!("No archive has a version older than {spec}");
            return Ok(());
        }
        found
    } else {
        None
    };

    match selected {
        Some(m) => {
            let destination = match &cli.destination {
                Some(destination) => destination.clone(),
                None => default_destination(&lookup),
            };
            app.restore(&lookup, &m.archive, &destination)?;
        }
        None => print_matches(&matches),
    }
    Ok(())
}

/// Without -d, restore next to where the file lives.
fn default_destination(lookup: &LookupPath) -> PathBuf {
    Path::new(&lookup.absolute)
        .parent()
        .unwrap_or_else(|| Path::new("/"))
        .to_path_buf()
}

fn print_matches(matches: &[ArchiveMatch]) {
    for m in matches {
        match Local.timestamp_opt(m.mtime, 0).earliest() {
            Some(stamp) => println!("{}\t{}", stamp.format("%Y-%m-%d %H:%M:%S"), m.archive),
            None => println!("@{}\t{}", m.mtime, m.archive),
        }
    }
}
