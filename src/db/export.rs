// src/db/export.rs

//! Channel export: primary.xml straight from the database
//!
//! Packages are streamed from one query in id order. Capability and file
//! rows are fetched per package on demand, so at most one package's rows
//! are held in memory at a time.

use crate::capability::{DependencyEntry, DependencyKind, PackageCursor};
use crate::db::models::{CapabilityRow, Channel, FileEntry, for_each_channel_package};
use crate::error::{Error, Result};
use crate::repository::{
    ExportStats, PackageCollection, PackageId, PackageRecord, PrimaryConfig, PrimaryXmlWriter,
};
use crate::sanitize::Sanitizer;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use tracing::info;

/// A channel's packages, read through a live connection
///
/// Text columns are decoded through a sanitizer owned by the collection;
/// the writer collects its per-package counts after each package.
pub struct ChannelCollection<'conn> {
    conn: &'conn Connection,
    channel_id: i64,
    package_count: usize,
    read_repairs: RefCell<Sanitizer>,
}

impl<'conn> ChannelCollection<'conn> {
    /// Scope an export to the channel with `label`
    pub fn open(conn: &'conn Connection, label: &str) -> Result<Self> {
        let channel = Channel::find_by_label(conn, label)?
            .ok_or_else(|| Error::NotFound(format!("channel '{}'", label)))?;
        let channel_id = channel
            .id
            .ok_or_else(|| Error::NotFound(format!("channel '{}' has no id", label)))?;

        Ok(Self {
            conn,
            channel_id,
            package_count: Channel::package_count(conn, channel_id)?,
            read_repairs: RefCell::new(Sanitizer::new()),
        })
    }

    /// Visit the channel's packages in id order
    pub fn for_each_package<F>(&self, f: F) -> Result<usize>
    where
        F: FnMut(PackageRecord) -> Result<()>,
    {
        for_each_channel_package(self.conn, self.channel_id, &self.read_repairs, f)
    }
}

impl PackageCollection for ChannelCollection<'_> {
    fn package_count(&self) -> usize {
        self.package_count
    }

    fn dependency_cursor(
        &self,
        kind: DependencyKind,
    ) -> Result<Box<dyn PackageCursor<DependencyEntry> + '_>> {
        Ok(Box::new(RowCursor::new(move |package_id| {
            CapabilityRow::find_by_package(
                self.conn,
                package_id,
                kind,
                &mut self.read_repairs.borrow_mut(),
            )
        })))
    }

    fn file_cursor(&self) -> Result<Box<dyn PackageCursor<String> + '_>> {
        Ok(Box::new(RowCursor::new(move |package_id| {
            let mut repairs = self.read_repairs.borrow_mut();
            FileEntry::paths_for_package(self.conn, package_id, &mut repairs)
        })))
    }

    fn take_read_repairs(&self, package_id: PackageId) -> usize {
        self.read_repairs.borrow_mut().take(package_id)
    }
}

/// Cursor that loads one package's rows the first time it is asked for them
struct RowCursor<T, F> {
    load: F,
    current: Option<PackageId>,
    pending: VecDeque<T>,
}

impl<T, F> RowCursor<T, F>
where
    F: FnMut(PackageId) -> Result<Vec<T>>,
{
    fn new(load: F) -> Self {
        Self {
            load,
            current: None,
            pending: VecDeque::new(),
        }
    }
}

impl<T, F> PackageCursor<T> for RowCursor<T, F>
where
    F: FnMut(PackageId) -> Result<Vec<T>>,
{
    fn next_for_package(&mut self, package_id: PackageId) -> Result<Option<T>> {
        if self.current != Some(package_id) {
            self.pending = (self.load)(package_id)?.into();
            self.current = Some(package_id);
        }
        Ok(self.pending.pop_front())
    }
}

/// Write primary.xml for the channel with `label` into `sink`
///
/// Returns the sink and the export counters. Any error leaves the sink
/// holding an incomplete document that must be discarded.
pub fn export_channel<W: Write>(
    conn: &Connection,
    label: &str,
    config: PrimaryConfig,
    sink: W,
) -> Result<(W, ExportStats)> {
    let collection = ChannelCollection::open(conn, label)?;
    info!(
        "Exporting channel {} ({} packages)",
        label,
        collection.package_count()
    );

    let mut writer = PrimaryXmlWriter::with_config(sink, config);
    writer.begin(&collection)?;
    collection.for_each_package(|package| writer.add_package(&package))?;
    let stats = writer.end()?;

    Ok((writer.into_inner(), stats))
}
