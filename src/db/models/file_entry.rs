// src/db/models/file_entry.rs

//! FileEntry model - file paths owned by a package

use crate::db::models::text_column;
use crate::error::Result;
use crate::repository::PackageId;
use crate::sanitize::Sanitizer;
use rusqlite::{Connection, params};

/// A file path owned by a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: Option<i64>,
    pub package_id: PackageId,
    pub path: String,
}

impl FileEntry {
    pub fn new(package_id: PackageId, path: String) -> Self {
        Self {
            id: None,
            package_id,
            path,
        }
    }

    /// Insert this file into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO package_files (package_id, path) VALUES (?1, ?2)",
            params![self.package_id, &self.path],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Paths owned by a package, in insertion order
    pub fn paths_for_package(
        conn: &Connection,
        package_id: PackageId,
        sanitizer: &mut Sanitizer,
    ) -> Result<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT path FROM package_files WHERE package_id = ?1 ORDER BY id",
        )?;

        let paths = stmt
            .query_map([package_id], |row| {
                Ok(text_column(row, 0, package_id, sanitizer)?.unwrap_or_default())
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(paths)
    }
}
