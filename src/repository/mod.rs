// src/repository/mod.rs

//! Repository metadata generation
//!
//! This module provides functionality for:
//! - Describing packages and the collections they are exported from
//! - Selecting the file paths listed in primary metadata
//! - Streaming primary.xml for a package collection

pub mod config;
pub mod files;
mod metadata;
pub mod primary;

pub use config::PrimaryConfig;
pub use files::is_essential_file;
pub use metadata::{MemoryCollection, PackageCollection, PackageId, PackageRecord};
pub use primary::{ExportStats, PrimaryXmlWriter, write_primary};
