// src/db/models/channel.rs

//! Channel model - a named set of packages published as one repository

use crate::error::Result;
use crate::repository::PackageId;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// A channel whose packages are exported together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Option<i64>,
    /// Unique label, e.g. "rhel-x86_64-server-7"
    pub label: String,
    pub name: Option<String>,
}

impl Channel {
    pub fn new(label: String) -> Self {
        Self {
            id: None,
            label,
            name: None,
        }
    }

    /// Insert this channel into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO channels (label, name) VALUES (?1, ?2)",
            params![&self.label, &self.name],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a channel by its label
    pub fn find_by_label(conn: &Connection, label: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare("SELECT id, label, name FROM channels WHERE label = ?1")?;
        let channel = stmt.query_row([label], Self::from_row).optional()?;
        Ok(channel)
    }

    /// List all channels ordered by label
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, label, name FROM channels ORDER BY label")?;
        let channels = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(channels)
    }

    /// Make a package a member of this channel
    pub fn add_package(conn: &Connection, channel_id: i64, package_id: PackageId) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO channel_packages (channel_id, package_id) VALUES (?1, ?2)",
            params![channel_id, package_id],
        )?;
        Ok(())
    }

    /// Number of packages in a channel
    pub fn package_count(conn: &Connection, channel_id: i64) -> Result<usize> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM channel_packages WHERE channel_id = ?1",
            [channel_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            label: row.get(1)?,
            name: row.get(2)?,
        })
    }
}
