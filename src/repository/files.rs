// src/repository/files.rs

//! Selection of the file paths listed in primary.xml
//!
//! primary.xml only carries the subset of owned files that dependency
//! solvers commonly resolve by path; the full list lives in filelists.xml.

/// Exact paths that are always listed
const ESSENTIAL_PATHS: &[&str] = &["/usr/lib/sendmail"];

/// Should `path` be listed in primary.xml?
///
/// True for anything in a `bin/` directory (`/usr/bin`, `/sbin`,
/// `/opt/x/bin`, ...), anything under `/etc/`, and the exact paths in
/// [`ESSENTIAL_PATHS`].
pub fn is_essential_file(path: &str) -> bool {
    path.contains("bin/") || path.starts_with("/etc/") || ESSENTIAL_PATHS.contains(&path)
}
