// src/repository/primary.rs

//! Streaming writer for primary.xml
//!
//! The document is produced in a single pass: `begin` opens the root
//! element and the capability cursors, each `add_package` writes one
//! complete `<package>` element, and `end` closes the root. Nothing but the
//! current package is held in memory, so the document size is bounded only
//! by the sink.
//!
//! Any failure of the sink poisons the writer. The output written so far is
//! incomplete and must be discarded.

use crate::capability::{DependencyEntry, DependencyKind, PackageCursor, SenseFlag};
use crate::error::{Error, Result};
use crate::repository::config::PrimaryConfig;
use crate::repository::files::is_essential_file;
use crate::repository::metadata::{PackageCollection, PackageId, PackageRecord};
use crate::sanitize::Sanitizer;
use crate::version::Evr;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::{Borrow, Cow};
use std::io::Write;
use tracing::{debug, info, warn};

/// Default namespace of primary.xml
pub const COMMON_NAMESPACE: &str = "http://linux.duke.edu/metadata/common";
/// Namespace of the `rpm:` prefixed elements
pub const RPM_NAMESPACE: &str = "http://linux.duke.edu/metadata/rpm";

/// Counters collected while writing one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Package count declared on the root element
    pub declared: usize,
    /// Packages actually written
    pub packages: usize,
    /// `rpm:entry` elements written across all dependency kinds
    pub dependencies: usize,
    /// File paths listed
    pub files_emitted: usize,
    /// File paths dropped as non-essential
    pub files_skipped: usize,
    /// Entries whose sense bits matched no operator
    pub sense_fallbacks: usize,
    /// Text fields that needed repair
    pub sanitized_fields: usize,
}

/// Cursors opened by `begin`, owned for the duration of one document
struct Cursors<'c> {
    collection: &'c dyn PackageCollection,
    dependencies: Vec<(DependencyKind, Box<dyn PackageCursor<DependencyEntry> + 'c>)>,
    files: Box<dyn PackageCursor<String> + 'c>,
}

enum WriterState<'c> {
    Unstarted,
    Open(Box<Cursors<'c>>),
    Closed,
    Failed,
}

impl WriterState<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Open(_) => "open",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }
}

/// Writes primary.xml for one package collection
///
/// Lifecycle: [`begin`](Self::begin) once, [`add_package`](Self::add_package)
/// for each package in the order the collection's cursors expect, then
/// [`end`](Self::end). A writer produces exactly one document.
pub struct PrimaryXmlWriter<'c, W: Write> {
    xml: quick_xml::Writer<W>,
    config: PrimaryConfig,
    sanitizer: Sanitizer,
    state: WriterState<'c>,
    stats: ExportStats,
}

impl<'c, W: Write> PrimaryXmlWriter<'c, W> {
    /// Create a writer with default settings
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, PrimaryConfig::default())
    }

    pub fn with_config(sink: W, config: PrimaryConfig) -> Self {
        let xml = match config.indent {
            Some(width) => quick_xml::Writer::new_with_indent(sink, b' ', width),
            None => quick_xml::Writer::new(sink),
        };

        Self {
            xml,
            config,
            sanitizer: Sanitizer::new(),
            state: WriterState::Unstarted,
            stats: ExportStats::default(),
        }
    }

    /// Open the document for `collection`
    ///
    /// Writes the root `metadata` element declaring the collection's package
    /// count and opens one cursor per dependency kind plus the file cursor.
    pub fn begin<C: PackageCollection>(&mut self, collection: &'c C) -> Result<()> {
        if !matches!(self.state, WriterState::Unstarted) {
            return Err(Error::InvalidState(format!(
                "cannot begin a document while writer is {}",
                self.state.name()
            )));
        }

        let mut dependencies = Vec::with_capacity(DependencyKind::all().len());
        for kind in DependencyKind::all() {
            dependencies.push((*kind, collection.dependency_cursor(*kind)?));
        }
        let cursors = Cursors {
            collection,
            dependencies,
            files: collection.file_cursor()?,
        };

        let declared = collection.package_count();
        info!("Writing primary metadata for {} packages", declared);

        self.state = WriterState::Failed;
        if self.config.xml_declaration {
            self.xml
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        let count = declared.to_string();
        self.write_start(
            "metadata",
            &[
                ("xmlns", COMMON_NAMESPACE),
                ("xmlns:rpm", RPM_NAMESPACE),
                ("packages", count.as_str()),
            ],
        )?;

        self.stats.declared = declared;
        self.state = WriterState::Open(Box::new(cursors));
        Ok(())
    }

    /// Write one `<package>` element
    pub fn add_package(&mut self, package: &PackageRecord) -> Result<()> {
        let mut cursors = self.take_cursors("add a package")?;
        debug!("Writing package {} ({})", package.id, package.nvra());

        self.write_package(package, &mut cursors)?;
        let read_repairs = cursors.collection.take_read_repairs(package.id);
        self.sanitizer.absorb(package.id, read_repairs);

        self.stats.packages += 1;
        self.state = WriterState::Open(cursors);
        Ok(())
    }

    /// Close the document and flush the sink
    pub fn end(&mut self) -> Result<ExportStats> {
        let _cursors = self.take_cursors("end the document")?;

        self.write_end("metadata")?;
        let sink = self.xml.get_mut();
        sink.write_all(b"\n")?;
        sink.flush()?;

        self.stats.sanitized_fields = self.sanitizer.repaired_fields();
        self.state = WriterState::Closed;

        if self.stats.packages != self.stats.declared {
            warn!(
                "Primary metadata declares {} packages but {} were written",
                self.stats.declared, self.stats.packages
            );
        }
        info!(
            "Primary metadata complete: {} packages, {} capabilities, {} files ({} repaired fields, {} sense fallbacks)",
            self.stats.packages,
            self.stats.dependencies,
            self.stats.files_emitted,
            self.stats.sanitized_fields,
            self.stats.sense_fallbacks
        );
        Ok(self.stats)
    }

    /// Repairs recorded so far, keyed by package id
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    pub fn stats(&self) -> ExportStats {
        self.stats
    }

    /// True once the document has been closed successfully
    pub fn is_closed(&self) -> bool {
        matches!(self.state, WriterState::Closed)
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }

    /// Take the open cursors, leaving the writer poisoned until they are put back
    fn take_cursors(&mut self, action: &str) -> Result<Box<Cursors<'c>>> {
        match std::mem::replace(&mut self.state, WriterState::Failed) {
            WriterState::Open(cursors) => Ok(cursors),
            other => {
                let err = Error::InvalidState(format!(
                    "cannot {} while writer is {}",
                    action,
                    other.name()
                ));
                self.state = other;
                Err(err)
            }
        }
    }

    fn write_package(&mut self, pkg: &PackageRecord, cursors: &mut Cursors<'c>) -> Result<()> {
        let id = pkg.id;
        self.write_start("package", &[("type", "rpm")])?;

        let name = self.clean(id, Some(&pkg.name));
        self.write_text("name", &name)?;
        let arch = self.clean(id, Some(&pkg.arch));
        self.write_text("arch", &arch)?;

        let ver = self.clean(id, Some(&pkg.version));
        let rel = self.clean(id, Some(&pkg.release));
        let epoch = pkg.epoch.as_deref().filter(|e| !e.is_empty()).unwrap_or("0");
        let epoch = self.clean(id, Some(epoch));
        self.write_empty(
            "version",
            &[("ver", &*ver), ("rel", &*rel), ("epoch", &*epoch)],
        )?;

        let md5 = self.clean(id, pkg.md5sum.as_deref());
        self.write_start("checksum", &[("type", "md5"), ("pkgid", "YES")])?;
        self.xml.write_event(Event::Text(BytesText::new(&md5)))?;
        self.write_end("checksum")?;

        let summary = self.clean(id, pkg.summary.as_deref());
        self.write_text("summary", &summary)?;
        let description = self.clean(id, pkg.description.as_deref());
        self.write_text("description", &description)?;

        self.write_empty("packager", &[])?;
        self.write_empty("url", &[])?;

        let build_time = pkg.build_time.timestamp().to_string();
        self.write_empty(
            "time",
            &[("file", build_time.as_str()), ("build", build_time.as_str())],
        )?;

        let package_size = pkg.package_size.to_string();
        let payload_size = pkg.payload_size.to_string();
        self.write_empty(
            "size",
            &[
                ("package", package_size.as_str()),
                ("archive", payload_size.as_str()),
                ("installed", ""),
            ],
        )?;

        let file_name = pkg.file_name();
        let file_name = self.clean(id, Some(&file_name));
        let href = format!("{}{}", self.config.location_prefix, file_name);
        self.write_empty("location", &[("href", href.as_str())])?;

        self.write_format(pkg, cursors)?;
        self.write_end("package")
    }

    fn write_format(&mut self, pkg: &PackageRecord, cursors: &mut Cursors<'c>) -> Result<()> {
        let id = pkg.id;
        self.write_start("format", &[])?;

        for (element, value) in [
            ("rpm:license", &pkg.license),
            ("rpm:vendor", &pkg.vendor),
            ("rpm:group", &pkg.group),
            ("rpm:buildhost", &pkg.build_host),
            ("rpm:sourcerpm", &pkg.source_rpm),
        ] {
            let text = self.clean(id, value.as_deref());
            self.write_text(element, &text)?;
        }

        let start = pkg.header_start.to_string();
        let end = pkg.header_end.to_string();
        self.write_empty(
            "rpm:header-range",
            &[("start", start.as_str()), ("end", end.as_str())],
        )?;

        for (kind, cursor) in cursors.dependencies.iter_mut() {
            self.write_dependencies(id, *kind, cursor.as_mut())?;
        }
        self.write_files(id, cursors.files.as_mut())?;

        self.write_end("format")
    }

    fn write_dependencies(
        &mut self,
        id: PackageId,
        kind: DependencyKind,
        cursor: &mut dyn PackageCursor<DependencyEntry>,
    ) -> Result<()> {
        self.write_start(kind.element_name(), &[])?;

        while let Some(entry) = cursor.next_for_package(id)? {
            let name = self.clean(id, Some(&entry.name));
            let raw = entry.version.as_deref().map(|v| self.clean(id, Some(v)));
            let evr = Evr::parse_opt(raw.as_deref());

            let mut attrs: Vec<(&str, &str)> = vec![("name", &*name)];
            if !evr.is_empty() {
                attrs.push(("flags", self.sense_token(id, kind, &entry).as_str()));
            }
            if let Some(epoch) = evr.effective_epoch() {
                attrs.push(("epoch", epoch));
            }
            if let Some(ref version) = evr.version {
                attrs.push(("ver", version.as_str()));
            }
            if let Some(ref release) = evr.release {
                attrs.push(("rel", release.as_str()));
            }

            self.write_empty("rpm:entry", &attrs)?;
            self.stats.dependencies += 1;
        }

        self.write_end(kind.element_name())
    }

    fn sense_token(
        &mut self,
        id: PackageId,
        kind: DependencyKind,
        entry: &DependencyEntry,
    ) -> SenseFlag {
        let decoded = SenseFlag::decode(entry.sense);
        if decoded.is_fallback() {
            self.stats.sense_fallbacks += 1;
            warn!(
                "Package {} {} entry '{}' has unrecognized sense {:#x}, writing {}",
                id,
                kind,
                entry.name,
                entry.sense,
                SenseFlag::FALLBACK
            );
        }
        decoded.flag()
    }

    fn write_files(&mut self, id: PackageId, cursor: &mut dyn PackageCursor<String>) -> Result<()> {
        while let Some(path) = cursor.next_for_package(id)? {
            let path = self.clean(id, Some(&path));
            if is_essential_file(&path) {
                self.write_text("file", &path)?;
                self.stats.files_emitted += 1;
            } else {
                self.stats.files_skipped += 1;
            }
        }
        Ok(())
    }

    fn clean<'a>(&mut self, id: PackageId, value: Option<&'a str>) -> Cow<'a, str> {
        self.sanitizer.sanitize(id, value)
    }

    fn write_start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Start(element))?;
        Ok(())
    }

    fn write_empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn write_end(&mut self, name: &str) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_text(&mut self, name: &str, text: &str) -> Result<()> {
        self.write_start(name, &[])?;
        self.xml.write_event(Event::Text(BytesText::new(text)))?;
        self.write_end(name)
    }
}

/// Write a complete document for `collection`
///
/// `packages` must be presented in the order the collection's cursors
/// expect. Returns the sink together with the export counters.
pub fn write_primary<W, C, I>(
    sink: W,
    config: PrimaryConfig,
    collection: &C,
    packages: I,
) -> Result<(W, ExportStats)>
where
    W: Write,
    C: PackageCollection,
    I: IntoIterator,
    I::Item: Borrow<PackageRecord>,
{
    let mut writer = PrimaryXmlWriter::with_config(sink, config);
    writer.begin(collection)?;
    for package in packages {
        writer.add_package(package.borrow())?;
    }
    let stats = writer.end()?;
    Ok((writer.into_inner(), stats))
}
