// src/capability/mod.rs
//! Package capabilities: provides, requires, conflicts and obsoletes
//!
//! Capability rows are consumed by the primary writer through cursors that
//! are advanced in lock-step with the package sequence. A cursor is handed
//! the id of the package currently being written and yields that package's
//! entries until the next entry belongs to some other package. Cursors never
//! rewind, so sources must group rows by package in the same order the
//! packages are written.

mod cursor;
pub mod sense;

pub use cursor::{GroupedCursor, PackageCursor};
pub use sense::{SenseDecode, SenseFlag};

use std::fmt;

/// Relationship a capability entry expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyKind {
    Provides,
    Requires,
    Conflicts,
    Obsoletes,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provides => "provides",
            Self::Requires => "requires",
            Self::Conflicts => "conflicts",
            Self::Obsoletes => "obsoletes",
        }
    }

    /// Element name wrapping entries of this kind in primary.xml
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Provides => "rpm:provides",
            Self::Requires => "rpm:requires",
            Self::Conflicts => "rpm:conflicts",
            Self::Obsoletes => "rpm:obsoletes",
        }
    }

    /// All kinds, in the order they appear inside `<format>`
    pub fn all() -> &'static [DependencyKind] {
        &[
            Self::Provides,
            Self::Requires,
            Self::Conflicts,
            Self::Obsoletes,
        ]
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single capability row of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Capability name (package name, soname, file path, virtual provide)
    pub name: String,
    /// Raw `[epoch:]version[-release]` string, if the capability is versioned
    pub version: Option<String>,
    /// RPM sense bitmask
    pub sense: i64,
}

impl DependencyEntry {
    /// Create an unversioned entry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            sense: 0,
        }
    }

    /// Create a versioned entry
    pub fn versioned(name: impl Into<String>, version: impl Into<String>, sense: i64) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            sense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<_> = DependencyKind::all().iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["provides", "requires", "conflicts", "obsoletes"]);
    }

    #[test]
    fn test_kind_element_names() {
        let names: Vec<_> = DependencyKind::all().iter().map(|k| k.element_name()).collect();
        assert_eq!(
            names,
            ["rpm:provides", "rpm:requires", "rpm:conflicts", "rpm:obsoletes"]
        );
    }

    #[test]
    fn test_entry_constructors() {
        let plain = DependencyEntry::new("libc.so.6");
        assert_eq!(plain.version, None);
        assert_eq!(plain.sense, 0);

        let versioned = DependencyEntry::versioned("glibc", "2.28", 0x0C);
        assert_eq!(versioned.version.as_deref(), Some("2.28"));
    }
}
