// src/db/models/capability.rs

//! CapabilityRow model - provides/requires/conflicts/obsoletes of a package

use crate::capability::{DependencyEntry, DependencyKind};
use crate::db::models::text_column;
use crate::error::Result;
use crate::repository::PackageId;
use crate::sanitize::Sanitizer;
use rusqlite::{Connection, params};

/// A capability row as stored in `package_capabilities`
#[derive(Debug, Clone)]
pub struct CapabilityRow {
    pub id: Option<i64>,
    pub package_id: PackageId,
    pub kind: DependencyKind,
    pub entry: DependencyEntry,
}

impl CapabilityRow {
    pub fn new(package_id: PackageId, kind: DependencyKind, entry: DependencyEntry) -> Self {
        Self {
            id: None,
            package_id,
            kind,
            entry,
        }
    }

    /// Insert this capability into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO package_capabilities (package_id, kind, name, version, sense)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.package_id,
                self.kind.as_str(),
                &self.entry.name,
                &self.entry.version,
                self.entry.sense
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Capabilities of one kind for a package, in insertion order
    ///
    /// Text repairs are recorded in `sanitizer` under `package_id`.
    pub fn find_by_package(
        conn: &Connection,
        package_id: PackageId,
        kind: DependencyKind,
        sanitizer: &mut Sanitizer,
    ) -> Result<Vec<DependencyEntry>> {
        let mut stmt = conn.prepare_cached(
            "SELECT name, version, sense FROM package_capabilities
             WHERE package_id = ?1 AND kind = ?2 ORDER BY id",
        )?;

        let entries = stmt
            .query_map(params![package_id, kind.as_str()], |row| {
                Ok(DependencyEntry {
                    name: text_column(row, 0, package_id, sanitizer)?.unwrap_or_default(),
                    version: text_column(row, 1, package_id, sanitizer)?,
                    sense: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
