// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Write operations for the index.
//!
//! Archive-level mutations (`add_archive`, `remove_archive`) change the
//! schema and must run inside [`Store::transaction`] so a failure leaves
//! the archives table and the column set consistent with each other.

use borg_restore_core::ArchiveName;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::connection::Store;
use crate::error::{Error, Result};
use crate::schema::{quote_identifier, timestamp_column};

impl Store {
    /// Register a new archive and add its timestamp column.
    ///
    /// Fails with [`Error::ArchiveExists`] if the archive is already
    /// indexed.
    pub fn add_archive(&self, archive: &ArchiveName) -> Result<()> {
        let exists = self
            .conn
            .query_row(
                "select 1 from archives where archive_name = ?1",
                params![archive.as_str()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Err(Error::ArchiveExists(archive.as_str().to_string()));
        }

        self.conn.execute(
            "insert into archives (archive_name) values (?1)",
            params![archive.as_str()],
        )?;
        self.conn.execute(
            &format!(
                "alter table files add column {} integer",
                quote_identifier(&timestamp_column(archive))
            ),
            [],
        )?;
        debug!(archive = archive.as_str(), "Added archive to index");
        Ok(())
    }

    /// Drop an archive, its column, and any rows left without a version.
    ///
    /// SQLite cannot drop a column from a populated table cheaply, so the
    /// files table is rebuilt with only the retained columns; rows whose
    /// retained timestamps are all null are not carried over. Removing an
    /// archive that is not indexed is a no-op. Call inside
    /// [`Store::transaction`] and [`Store::compact`] afterwards.
    pub fn remove_archive(&self, archive: &ArchiveName) -> Result<()> {
        let known = self.archive_names()?;
        if !known.contains(archive) {
            return Ok(());
        }
        let retained: Vec<String> = known
            .iter()
            .filter(|name| *name != archive)
            .map(|name| quote_identifier(&timestamp_column(name)))
            .collect();

        let mut ddl = String::from("create table files_new (path text primary key not null");
        for column in &retained {
            ddl.push_str(", ");
            ddl.push_str(column);
            ddl.push_str(" integer");
        }
        ddl.push_str(") strict");
        self.conn.execute(&ddl, [])?;

        if !retained.is_empty() {
            let column_list = retained.join(", ");
            let any_non_null = retained
                .iter()
                .map(|column| format!("{column} is not null"))
                .collect::<Vec<_>>()
                .join(" or ");
            self.conn.execute(
                &format!(
                    "insert into files_new (path, {column_list}) \
                     select path, {column_list} from files where {any_non_null}"
                ),
                [],
            )?;
        }

        self.conn.execute("drop table files", [])?;
        self.conn
            .execute("alter table files_new rename to files", [])?;
        self.conn.execute(
            "delete from archives where archive_name = ?1",
            params![archive.as_str()],
        )?;
        debug!(archive = archive.as_str(), "Removed archive from index");
        Ok(())
    }

    /// Record `mtime` for `path` in an archive's column, keeping the
    /// maximum of the current and the new value.
    pub fn upsert_path(&self, archive: &ArchiveName, path: &str, mtime: i64) -> Result<()> {
        let column = quote_identifier(&timestamp_column(archive));
        let sql = format!(
            "insert into files (path, {column}) values (?1, ?2) \
             on conflict (path) do update \
             set {column} = max(coalesce({column}, excluded.{column}), excluded.{column})"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params![path, mtime])?;
        Ok(())
    }
}
