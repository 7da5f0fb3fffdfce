// src/sanitize.rs
//! Repair of text fields that cannot be represented in XML 1.0
//!
//! Database text is not guaranteed to be clean: control characters and
//! broken encodings occasionally end up in summaries, descriptions and
//! changelog-derived fields. One bad field must not stop a repository from
//! being published, so offending characters are dropped and the repair is
//! recorded against the package that carried them.
//!
//! Markup escaping (`&`, `<`, `>`, quotes) is the XML writer's job and is
//! not done here.

use crate::repository::PackageId;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::warn;

/// Is `c` allowed in XML 1.0 character data?
///
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
/// Surrogates cannot occur in a Rust `char`.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Drop every character that is not legal XML 1.0
///
/// Borrows when nothing needs to change.
pub fn strip_illegal_xml(input: &str) -> Cow<'_, str> {
    if input.chars().all(is_xml_char) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

/// Sanitizes text fields and tracks which packages needed repairs
#[derive(Debug, Default)]
pub struct Sanitizer {
    repaired: BTreeMap<PackageId, usize>,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a possibly absent field safe to embed in XML
    ///
    /// Absent fields become the empty string.
    pub fn sanitize<'a>(&mut self, package_id: PackageId, input: Option<&'a str>) -> Cow<'a, str> {
        let Some(input) = input else {
            return Cow::Borrowed("");
        };

        let clean = strip_illegal_xml(input);
        if let Cow::Owned(_) = clean {
            self.record(package_id, "illegal XML characters");
        }
        clean
    }

    /// Like [`Sanitizer::sanitize`], for raw bytes of unknown encoding
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn sanitize_bytes<'a>(&mut self, package_id: PackageId, input: &'a [u8]) -> Cow<'a, str> {
        match String::from_utf8_lossy(input) {
            Cow::Borrowed(text) => self.sanitize(package_id, Some(text)),
            Cow::Owned(text) => {
                self.record(package_id, "invalid UTF-8");
                Cow::Owned(strip_illegal_xml(&text).into_owned())
            }
        }
    }

    /// Number of repaired fields per package id
    pub fn diagnostics(&self) -> &BTreeMap<PackageId, usize> {
        &self.repaired
    }

    /// Total number of repaired fields across all packages
    pub fn repaired_fields(&self) -> usize {
        self.repaired.values().sum()
    }

    /// Remove and return the repair count recorded for one package
    pub fn take(&mut self, package_id: PackageId) -> usize {
        self.repaired.remove(&package_id).unwrap_or(0)
    }

    /// Add repairs another sanitizer already recorded and logged
    pub fn absorb(&mut self, package_id: PackageId, count: usize) {
        if count > 0 {
            *self.repaired.entry(package_id).or_insert(0) += count;
        }
    }

    fn record(&mut self, package_id: PackageId, reason: &str) {
        warn!("Package {} metadata contains {}, cleanup applied", package_id, reason);
        *self.repaired.entry(package_id).or_insert(0) += 1;
    }
}
