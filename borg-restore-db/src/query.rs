// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read query operations for the index.

use borg_restore_core::ArchiveName;
use rusqlite::params;

use crate::connection::Store;
use crate::error::Result;
use crate::schema::timestamp_column;

impl Store {
    /// Enumerate indexed archives in insertion order.
    pub fn archive_names(&self) -> Result<Vec<ArchiveName>> {
        let mut stmt = self
            .conn
            .prepare_cached("select archive_name from archives order by rowid")?;

        let mut names = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            names.push(ArchiveName::new(name)?);
        }
        Ok(names)
    }

    /// All versions of a path, one entry per known archive in insertion
    /// order.
    ///
    /// A `None` mtime means the path does not exist in that archive. A
    /// path with no row at all (including the root sentinel `.`) yields
    /// `None` for every archive.
    pub fn get_archives_for_path(&self, path: &str) -> Result<Vec<(ArchiveName, Option<i64>)>> {
        let archives = self.archive_names()?;
        if archives.is_empty() {
            return Ok(Vec::new());
        }

        // Not cached: the column set changes whenever an archive is added
        // or removed, and lookups are one-shot per process.
        let mut stmt = self.conn.prepare("select * from files where path = ?1")?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query(params![path])?;
        let row = rows.next()?;

        let mut result = Vec::with_capacity(archives.len());
        for archive in archives {
            let mtime = match &row {
                Some(row) => {
                    let column = timestamp_column(&archive);
                    match columns.iter().position(|c| *c == column) {
                        Some(index) => row.get::<_, Option<i64>>(index)?,
                        None => None,
                    }
                }
                None => None,
            };
            result.push((archive, mtime));
        }
        Ok(result)
    }
}
