use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "borg-restore")]
#[command(about = "Restore files from borg backups without scanning every archive")]
#[command(version, long_about = None)]
pub struct Cli {
    /// File or directory to look up in the archive index
    pub path: Option<String>,

    /// Synchronize the index with the repository's current archives
    #[arg(short, long)]
    pub update_cache: bool,

    /// Directory to restore into (defaults to the parent of PATH)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Restore from the newest archive older than this age (e.g. 5d, 1.5h)
    #[arg(short, long, conflicts_with = "archive")]
    pub time: Option<String>,

    /// Restore from this archive
    #[arg(short, long)]
    pub archive: Option<String>,

    /// Only list the archives containing PATH
    #[arg(short, long, conflicts_with_all = ["time", "archive", "destination"])]
    pub list: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
