// src/capability/cursor.rs
//! Forward-only cursors over capability rows grouped by package

use crate::error::Result;
use crate::repository::PackageId;
use std::iter::Peekable;

/// Forward-only stream of per-package rows
///
/// Implementations hand out the rows belonging to `package_id` one at a
/// time and return `None` once the rows for that package are exhausted.
/// Callers ask for packages in export order and never revisit one.
pub trait PackageCursor<T> {
    /// Next row belonging to `package_id`, or `None` when there are no more
    fn next_for_package(&mut self, package_id: PackageId) -> Result<Option<T>>;
}

/// Cursor over an iterator of `(package id, row)` pairs
///
/// The iterator must yield rows grouped by package, in export order. Rows
/// are pulled lazily; at most one row is buffered.
pub struct GroupedCursor<I: Iterator> {
    rows: Peekable<I>,
}

impl<I: Iterator> GroupedCursor<I> {
    pub fn new(rows: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            rows: rows.into_iter().peekable(),
        }
    }
}

impl<I, T> PackageCursor<T> for GroupedCursor<I>
where
    I: Iterator<Item = (PackageId, T)>,
{
    fn next_for_package(&mut self, package_id: PackageId) -> Result<Option<T>> {
        Ok(self
            .rows
            .next_if(|(owner, _)| *owner == package_id)
            .map(|(_, row)| row))
    }
}
