// src/db/models/mod.rs

//! Data models for repository database entities
//!
//! This module maps database rows onto the types primary metadata
//! generation consumes and provides the insert helpers used to populate a
//! database.

mod capability;
mod channel;
mod file_entry;
mod package;

pub use capability::CapabilityRow;
pub use channel::Channel;
pub use file_entry::FileEntry;
pub use package::{for_each_channel_package, insert_package};

use crate::repository::PackageId;
use crate::sanitize::Sanitizer;
use rusqlite::Row;
use rusqlite::types::ValueRef;

/// Read a nullable text column through `sanitizer`
///
/// Text written by older tooling is not always valid UTF-8 or legal XML.
/// Rather than failing the row, broken sequences become U+FFFD, illegal
/// characters are dropped, and the repair is recorded against the owning
/// package.
pub(crate) fn text_column(
    row: &Row,
    idx: usize,
    package_id: PackageId,
    sanitizer: &mut Sanitizer,
) -> rusqlite::Result<Option<String>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Ok(Some(sanitizer.sanitize_bytes(package_id, bytes).into_owned()))
        }
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            format!("column {idx}"),
            other.data_type(),
        )),
    }
}
