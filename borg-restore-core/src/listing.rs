// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Parser for borg's per-file listing lines.
//!
//! `borg list --format="{mtime} {path}{NL}"` emits lines like
//!
//! ```text
//! Mon, 2024-03-11 17:28:05 home/user/.bashrc
//! ```
//!
//! The leading four characters are the weekday abbreviation and a comma.

use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime, TimeZone};
use regex::Regex;

static LISTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{4} (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) (.+)$").unwrap());

/// One file entry from an archive listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    /// Path as stored inside the archive (no leading slash)
    pub path: String,
    /// Modification time in Unix epoch seconds
    pub mtime: i64,
}

impl ListingLine {
    /// Parse one listing line, or `None` if it does not match the format.
    ///
    /// The timestamp carries no zone; it is interpreted in the process's
    /// local time zone at the moment of parsing. Re-ingesting the same
    /// archive under a different TZ therefore yields different stored
    /// mtimes. This matches what borg prints and what existing indexes
    /// contain, so it stays. Ambiguous local times (DST fold) resolve to
    /// the earlier instant; times inside a DST gap are skipped like any
    /// other unparseable line.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = LISTING_RE.captures(line)?;
        let naive = NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%d %H:%M:%S").ok()?;
        let mtime = Local.from_local_datetime(&naive).earliest()?.timestamp();
        Some(Self {
            path: caps[2].to_string(),
            mtime,
        })
    }
}
