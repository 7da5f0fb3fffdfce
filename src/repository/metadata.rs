// src/repository/metadata.rs

//! Repository metadata data structures
//!
//! Contains the per-package facts written into primary.xml and the
//! collection abstraction that scopes an export: how many packages it
//! declares and where their capability rows come from.

use crate::capability::{DependencyEntry, DependencyKind, GroupedCursor, PackageCursor};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Database identifier of a package
pub type PackageId = i64;

/// Everything primary.xml says about one package
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub id: PackageId,
    pub name: String,
    pub arch: String,
    pub version: String,
    pub release: String,
    pub epoch: Option<String>,
    /// MD5 hex digest of the package file
    pub md5sum: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub vendor: Option<String>,
    /// License string (the RPM `Copyright`/`License` tag)
    pub license: Option<String>,
    pub build_host: Option<String>,
    pub source_rpm: Option<String>,
    pub group: Option<String>,
    /// Size of the package file on disk
    pub package_size: u64,
    /// Uncompressed payload size
    pub payload_size: u64,
    pub build_time: DateTime<Utc>,
    /// Byte range of the RPM header inside the package file
    pub header_start: u64,
    pub header_end: u64,
    /// Storage path of the package file
    pub path: Option<String>,
    /// Path relative to the package manager download root
    pub download_path: Option<String>,
}

impl PackageRecord {
    /// Create a record with identity set and every other fact empty
    pub fn new(
        id: PackageId,
        name: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            arch: arch.into(),
            version: version.into(),
            release: release.into(),
            epoch: None,
            md5sum: None,
            summary: None,
            description: None,
            vendor: None,
            license: None,
            build_host: None,
            source_rpm: None,
            group: None,
            package_size: 0,
            payload_size: 0,
            build_time: DateTime::default(),
            header_start: 0,
            header_end: 0,
            path: None,
            download_path: None,
        }
    }

    /// `name-version-release.arch`
    pub fn nvra(&self) -> String {
        format!("{}-{}-{}.{}", self.name, self.version, self.release, self.arch)
    }

    /// File name the package is served under
    ///
    /// The last segment of the storage path, or `name-version-release.arch.rpm`
    /// when the path has no segments.
    pub fn file_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|path| path.split('/').filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.rpm", self.nvra()))
    }
}

/// The set of packages one primary.xml document describes
///
/// The writer asks for the declared package count once, and opens one
/// cursor per dependency kind plus one over owned file paths. Cursors must
/// yield rows in the same package order the caller will write packages in.
/// Sources that repair text while decoding it report those repairs through
/// [`take_read_repairs`](Self::take_read_repairs).
pub trait PackageCollection {
    /// Number of packages the document declares
    fn package_count(&self) -> usize;

    /// Cursor over capability rows of one kind
    fn dependency_cursor(
        &self,
        kind: DependencyKind,
    ) -> Result<Box<dyn PackageCursor<DependencyEntry> + '_>>;

    /// Cursor over owned file paths
    fn file_cursor(&self) -> Result<Box<dyn PackageCursor<String> + '_>>;

    /// Text fields of `package_id` repaired while its rows were read
    ///
    /// Called once after each package is written. Sources that hand out
    /// text as stored report nothing.
    fn take_read_repairs(&self, _package_id: PackageId) -> usize {
        0
    }
}

/// In-memory package collection
///
/// Rows may be added in any order; cursors hand them out in the order the
/// owning packages were added, keeping each package's rows in insertion
/// order. Rows for packages missing from the collection sort last.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    packages: Vec<PackageRecord>,
    dependencies: Vec<(PackageId, DependencyKind, DependencyEntry)>,
    files: Vec<(PackageId, String)>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_package(&mut self, package: PackageRecord) -> &mut Self {
        self.packages.push(package);
        self
    }

    pub fn add_dependency(
        &mut self,
        package_id: PackageId,
        kind: DependencyKind,
        entry: DependencyEntry,
    ) -> &mut Self {
        self.dependencies.push((package_id, kind, entry));
        self
    }

    pub fn add_file(&mut self, package_id: PackageId, path: impl Into<String>) -> &mut Self {
        self.files.push((package_id, path.into()));
        self
    }

    pub fn packages(&self) -> &[PackageRecord] {
        &self.packages
    }

    /// Position of each package in write order
    fn positions(&self) -> HashMap<PackageId, usize> {
        self.packages
            .iter()
            .enumerate()
            .map(|(pos, pkg)| (pkg.id, pos))
            .collect()
    }

    /// Stable-sort rows into package write order
    fn in_package_order<'a, T: 'a>(
        &self,
        rows: impl Iterator<Item = (PackageId, &'a T)>,
    ) -> Vec<(PackageId, &'a T)> {
        let positions = self.positions();
        let mut rows: Vec<_> = rows.collect();
        rows.sort_by_key(|(id, _)| positions.get(id).copied().unwrap_or(usize::MAX));
        rows
    }
}

impl PackageCollection for MemoryCollection {
    fn package_count(&self) -> usize {
        self.packages.len()
    }

    fn dependency_cursor(
        &self,
        kind: DependencyKind,
    ) -> Result<Box<dyn PackageCursor<DependencyEntry> + '_>> {
        let rows = self.in_package_order(
            self.dependencies
                .iter()
                .filter(|(_, k, _)| *k == kind)
                .map(|(id, _, entry)| (*id, entry)),
        );
        Ok(Box::new(GroupedCursor::new(
            rows.into_iter().map(|(id, entry)| (id, entry.clone())),
        )))
    }

    fn file_cursor(&self) -> Result<Box<dyn PackageCursor<String> + '_>> {
        let rows = self.in_package_order(self.files.iter().map(|(id, path)| (*id, path)));
        Ok(Box::new(GroupedCursor::new(
            rows.into_iter().map(|(id, path)| (id, path.clone())),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(cursor: &mut dyn PackageCursor<T>, id: PackageId) -> Vec<T> {
        let mut rows = Vec::new();
        while let Some(row) = cursor.next_for_package(id).unwrap() {
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_file_name_from_path() {
        let mut pkg = PackageRecord::new(1, "foo", "1.0", "1", "x86_64");
        pkg.path = Some("/repo/foo-1.0-1.x86_64.rpm".to_string());
        assert_eq!(pkg.file_name(), "foo-1.0-1.x86_64.rpm");

        pkg.path = Some("rhn/packages/1/abc/foo-1.0-1.x86_64.rpm/".to_string());
        assert_eq!(pkg.file_name(), "foo-1.0-1.x86_64.rpm");
    }

    #[test]
    fn test_file_name_synthesized() {
        let mut pkg = PackageRecord::new(1, "foo", "1.0", "1", "noarch");
        assert_eq!(pkg.file_name(), "foo-1.0-1.noarch.rpm");

        pkg.path = Some("///".to_string());
        assert_eq!(pkg.file_name(), "foo-1.0-1.noarch.rpm");

        pkg.path = Some(String::new());
        assert_eq!(pkg.file_name(), "foo-1.0-1.noarch.rpm");
    }

    #[test]
    fn test_memory_collection_orders_rows_by_package() {
        let mut collection = MemoryCollection::new();
        collection
            .add_package(PackageRecord::new(20, "b", "1", "1", "noarch"))
            .add_package(PackageRecord::new(10, "a", "1", "1", "noarch"))
            .add_file(10, "/usr/bin/a")
            .add_file(20, "/usr/bin/b")
            .add_file(10, "/etc/a.conf")
            .add_file(99, "/orphan");

        let mut files = collection.file_cursor().unwrap();
        assert_eq!(drain(files.as_mut(), 20), ["/usr/bin/b"]);
        assert_eq!(drain(files.as_mut(), 10), ["/usr/bin/a", "/etc/a.conf"]);
        assert_eq!(drain(files.as_mut(), 99), ["/orphan"]);
    }

    #[test]
    fn test_memory_collection_filters_by_kind() {
        let mut collection = MemoryCollection::new();
        collection
            .add_package(PackageRecord::new(1, "a", "1", "1", "noarch"))
            .add_dependency(1, DependencyKind::Requires, DependencyEntry::new("libc.so.6"))
            .add_dependency(1, DependencyKind::Provides, DependencyEntry::new("a"));

        let mut provides = collection.dependency_cursor(DependencyKind::Provides).unwrap();
        let mut obsoletes = collection.dependency_cursor(DependencyKind::Obsoletes).unwrap();
        assert_eq!(drain(provides.as_mut(), 1), [DependencyEntry::new("a")]);
        assert!(drain(obsoletes.as_mut(), 1).is_empty());
        assert_eq!(collection.package_count(), 1);
    }
}
