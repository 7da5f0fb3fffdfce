// src/db/schema.rs

//! Database schema definitions and migrations
//!
//! The schema holds exactly what primary metadata generation reads:
//! channels, the packages they contain, and per-package capability and
//! file rows. Row ids double as the emission order of capability and file
//! rows within a package.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the schema version tracking table
fn init_schema_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    init_schema_version(conn)?;

    let version = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Set the schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Apply all pending migrations to bring the database up to date
pub fn migrate(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    debug!("Current schema version: {}", current_version);

    if current_version >= SCHEMA_VERSION {
        debug!("Schema is up to date");
        return Ok(());
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        info!("Applying migration to version {}", version);
        apply_migration(conn, version)?;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        _ => unreachable!("no migration for schema version {}", version),
    }
}

/// Initial schema - Version 1
///
/// - channels: named package sets that are published as one repository
/// - packages: per-package facts written into primary.xml
/// - channel_packages: channel membership
/// - package_capabilities: provides/requires/conflicts/obsoletes rows
/// - package_files: owned file paths
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE channels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL UNIQUE,
            name TEXT
        );

        CREATE TABLE packages (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            version TEXT NOT NULL,
            release TEXT NOT NULL,
            epoch TEXT,
            arch TEXT NOT NULL,
            md5sum TEXT,
            summary TEXT,
            description TEXT,
            vendor TEXT,
            license TEXT,
            build_host TEXT,
            source_rpm TEXT,
            package_group TEXT,
            package_size INTEGER NOT NULL DEFAULT 0,
            payload_size INTEGER NOT NULL DEFAULT 0,
            build_time INTEGER NOT NULL DEFAULT 0,
            header_start INTEGER NOT NULL DEFAULT 0,
            header_end INTEGER NOT NULL DEFAULT 0,
            path TEXT,
            download_path TEXT
        );

        CREATE INDEX idx_packages_name ON packages(name);

        CREATE TABLE channel_packages (
            channel_id INTEGER NOT NULL,
            package_id INTEGER NOT NULL,
            PRIMARY KEY (channel_id, package_id),
            FOREIGN KEY (channel_id) REFERENCES channels(id) ON DELETE CASCADE,
            FOREIGN KEY (package_id) REFERENCES packages(id) ON DELETE CASCADE
        );

        CREATE TABLE package_capabilities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            package_id INTEGER NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('provides', 'requires', 'conflicts', 'obsoletes')),
            name TEXT NOT NULL,
            version TEXT,
            sense INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (package_id) REFERENCES packages(id) ON DELETE CASCADE
        );

        CREATE INDEX idx_capabilities_package ON package_capabilities(package_id, kind, id);

        CREATE TABLE package_files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            package_id INTEGER NOT NULL,
            path TEXT NOT NULL,
            FOREIGN KEY (package_id) REFERENCES packages(id) ON DELETE CASCADE
        );

        CREATE INDEX idx_files_package ON package_files(package_id, id);
        ",
    )?;

    Ok(())
}
