// src/db/mod.rs

//! SQLite storage for channels, packages and their capabilities
//!
//! Provides the database-backed implementation of
//! [`PackageCollection`](crate::repository::PackageCollection) used to
//! export a channel's primary.xml.

mod export;
pub mod models;
pub mod schema;

pub use export::{ChannelCollection, export_channel};

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::info;

/// Create the database at `db_path` and bring its schema up to date
pub fn init(db_path: &str) -> Result<()> {
    info!("Initializing repository database at {}", db_path);

    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::InitError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    let conn = open(db_path)?;
    schema::migrate(&conn)?;
    Ok(())
}

/// Open an existing database
pub fn open(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Run `f` inside a transaction, committing only if it succeeds
pub fn transaction<F, T>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let result = f(&tx)?;
    tx.commit()?;
    Ok(result)
}
