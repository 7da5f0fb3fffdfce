// src/db/models/package.rs

//! Package rows - the per-package facts written into primary.xml

use crate::db::models::text_column;
use crate::error::Result;
use crate::repository::{PackageId, PackageRecord};
use crate::sanitize::Sanitizer;
use chrono::DateTime;
use rusqlite::{Connection, Row, params};
use std::cell::RefCell;

const PACKAGE_COLUMNS: &str = "p.id, p.name, p.version, p.release, p.epoch, p.arch, p.md5sum,
     p.summary, p.description, p.vendor, p.license, p.build_host, p.source_rpm,
     p.package_group, p.package_size, p.payload_size, p.build_time, p.header_start,
     p.header_end, p.path, p.download_path";

/// Insert a package, keeping its id
pub fn insert_package(conn: &Connection, pkg: &PackageRecord) -> Result<PackageId> {
    conn.execute(
        "INSERT INTO packages (id, name, version, release, epoch, arch, md5sum, summary,
             description, vendor, license, build_host, source_rpm, package_group,
             package_size, payload_size, build_time, header_start, header_end, path,
             download_path)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                 ?17, ?18, ?19, ?20, ?21)",
        params![
            pkg.id,
            &pkg.name,
            &pkg.version,
            &pkg.release,
            &pkg.epoch,
            &pkg.arch,
            &pkg.md5sum,
            &pkg.summary,
            &pkg.description,
            &pkg.vendor,
            &pkg.license,
            &pkg.build_host,
            &pkg.source_rpm,
            &pkg.group,
            pkg.package_size,
            pkg.payload_size,
            pkg.build_time.timestamp(),
            pkg.header_start,
            pkg.header_end,
            &pkg.path,
            &pkg.download_path,
        ],
    )?;

    Ok(pkg.id)
}

/// Stream the packages of a channel in id order
///
/// Rows are handed to `f` one at a time while the query is still stepping,
/// so the channel is never materialized. Returns the number of packages
/// visited. An error from `f` stops the iteration and is returned.
///
/// `sanitizer` is only borrowed while a row is decoded, so `f` may record
/// into it as well.
pub fn for_each_channel_package<F>(
    conn: &Connection,
    channel_id: i64,
    sanitizer: &RefCell<Sanitizer>,
    mut f: F,
) -> Result<usize>
where
    F: FnMut(PackageRecord) -> Result<()>,
{
    let sql = format!(
        "SELECT {PACKAGE_COLUMNS}
         FROM packages p
         JOIN channel_packages cp ON cp.package_id = p.id
         WHERE cp.channel_id = ?1
         ORDER BY p.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([channel_id])?;

    let mut visited = 0;
    while let Some(row) = rows.next()? {
        let package = package_from_row(row, &mut sanitizer.borrow_mut())?;
        f(package)?;
        visited += 1;
    }

    Ok(visited)
}

fn package_from_row(row: &Row, sanitizer: &mut Sanitizer) -> rusqlite::Result<PackageRecord> {
    let id: PackageId = row.get(0)?;
    let build_time: i64 = row.get(16)?;

    Ok(PackageRecord {
        id,
        name: text_column(row, 1, id, sanitizer)?.unwrap_or_default(),
        version: text_column(row, 2, id, sanitizer)?.unwrap_or_default(),
        release: text_column(row, 3, id, sanitizer)?.unwrap_or_default(),
        epoch: text_column(row, 4, id, sanitizer)?,
        arch: text_column(row, 5, id, sanitizer)?.unwrap_or_default(),
        md5sum: text_column(row, 6, id, sanitizer)?,
        summary: text_column(row, 7, id, sanitizer)?,
        description: text_column(row, 8, id, sanitizer)?,
        vendor: text_column(row, 9, id, sanitizer)?,
        license: text_column(row, 10, id, sanitizer)?,
        build_host: text_column(row, 11, id, sanitizer)?,
        source_rpm: text_column(row, 12, id, sanitizer)?,
        group: text_column(row, 13, id, sanitizer)?,
        package_size: row.get(14)?,
        payload_size: row.get(15)?,
        build_time: DateTime::from_timestamp(build_time, 0).unwrap_or_default(),
        header_start: row.get(17)?,
        header_end: row.get(18)?,
        path: text_column(row, 19, id, sanitizer)?,
        download_path: text_column(row, 20, id, sanitizer)?,
    })
}
