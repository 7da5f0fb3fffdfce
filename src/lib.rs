// src/lib.rs

//! RPM repository primary metadata generator
//!
//! Streams the `primary.xml` document of a yum/dnf repository for a set of
//! packages: identity, checksum, descriptive text, sizes, download location,
//! dependency capabilities and the essential subset of owned files.
//!
//! # Architecture
//!
//! - Single pass: packages are written as they are read, nothing is buffered
//! - Cursors: capability and file rows are consumed in lock-step with packages
//! - Repair, don't abort: illegal characters are stripped and reported per package
//! - Database-backed collections: channels exported straight from SQLite

pub mod capability;
pub mod db;
mod error;
pub mod repository;
pub mod sanitize;
pub mod version;

pub use capability::{DependencyEntry, DependencyKind, PackageCursor, SenseFlag};
pub use error::{Error, Result};
pub use repository::{
    ExportStats, MemoryCollection, PackageCollection, PackageId, PackageRecord, PrimaryConfig,
    PrimaryXmlWriter, write_primary,
};
pub use sanitize::Sanitizer;
pub use version::Evr;
