// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Schema definitions for the path index.
//!
//! The `files` table starts with only the path column; every indexed
//! archive contributes one nullable `timestamp-<name>` integer column via
//! `ALTER TABLE`. The `archives` table enumerates exactly the set of
//! those columns, in insertion order (rowid).

use borg_restore_core::ArchiveName;

/// Core schema SQL (files, archives)
pub(crate) const SCHEMA_SQL: &str = r#"
create table if not exists files (
    path text primary key not null
) strict;

create table if not exists archives (
    archive_name text unique not null
) strict;
"#;

/// Directory component under the cache base that encodes the schema
/// version; bumping the schema means a fresh directory and a rebuild.
pub const SCHEMA_SUBDIR: &str = "v2";

/// File name of the index database below [`SCHEMA_SUBDIR`].
pub const DB_FILE_NAME: &str = "archives.db";

/// Raw (unquoted) name of an archive's timestamp column.
pub(crate) fn timestamp_column(archive: &ArchiveName) -> String {
    format!("timestamp-{}", archive.as_str())
}

/// Quote a column identifier for interpolation into SQL.
///
/// The identifier comes from [`timestamp_column`] over an untainted
/// [`ArchiveName`], so it can never contain a double quote.
pub(crate) fn quote_identifier(identifier: &str) -> String {
    format!("\"{identifier}\"")
}
