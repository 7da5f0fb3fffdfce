// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use quick_xml::Reader;
use quick_xml::events::Event;
use repomd_primary::db::{
    self,
    models::{CapabilityRow, Channel, FileEntry, insert_package},
};
use repomd_primary::{DependencyEntry, DependencyKind, PackageRecord};
use tempfile::TempDir;

/// Label of the channel created by [`setup_channel_db`]
pub const TEST_CHANNEL: &str = "rhel-x86_64-server-8";

/// bash: plain epoch, mixed requires and provides, three files
pub fn bash_package() -> PackageRecord {
    let mut pkg = PackageRecord::new(10, "bash", "4.4.19", "7.el8", "x86_64");
    pkg.md5sum = Some("0c8a1b2d3e4f5a6b7c8d9e0f1a2b3c4d".to_string());
    pkg.summary = Some("The GNU Bourne Again shell".to_string());
    pkg.description = Some(
        "The GNU Bourne Again shell (Bash) is a shell or command language interpreter.".to_string(),
    );
    pkg.vendor = Some("Red Hat, Inc.".to_string());
    pkg.license = Some("GPLv3+".to_string());
    pkg.build_host = Some("x86-vm-07.build.eng.bos.redhat.com".to_string());
    pkg.source_rpm = Some("bash-4.4.19-7.el8.src.rpm".to_string());
    pkg.group = Some("Unspecified".to_string());
    pkg.package_size = 1_623_524;
    pkg.payload_size = 6_931_292;
    pkg.build_time = chrono::DateTime::from_timestamp(1_544_460_226, 0).unwrap();
    pkg.header_start = 4504;
    pkg.header_end = 54_820;
    pkg.path = Some(
        "redhat/1/0c8/bash/4.4.19-7.el8/x86_64/0c8a/bash-4.4.19-7.el8.x86_64.rpm".to_string(),
    );
    pkg
}

/// nginx: explicit epoch, conflicts and obsoletes, two files
pub fn nginx_package() -> PackageRecord {
    let mut pkg = PackageRecord::new(20, "nginx", "1.14.1", "8.module+el8", "x86_64");
    pkg.epoch = Some("1".to_string());
    pkg.md5sum = Some("9f8e7d6c5b4a39281706f5e4d3c2b1a0".to_string());
    pkg.summary = Some("A high performance web server & reverse proxy".to_string());
    pkg.package_size = 580_000;
    pkg.payload_size = 1_700_000;
    pkg.build_time = chrono::DateTime::from_timestamp(1_550_000_000, 0).unwrap();
    pkg
}

/// A package that exists in the database but not in the test channel
pub fn orphan_package() -> PackageRecord {
    PackageRecord::new(30, "orphan", "0.1", "1", "noarch")
}

/// Capability rows, in insertion order, for the packages above
pub fn test_dependencies() -> Vec<(i64, DependencyKind, DependencyEntry)> {
    vec![
        (10, DependencyKind::Provides, DependencyEntry::new("/bin/sh")),
        (10, DependencyKind::Provides, DependencyEntry::versioned("bash", "4.4.19-7.el8", 0x08)),
        (10, DependencyKind::Requires, DependencyEntry::new("libc.so.6()(64bit)")),
        (10, DependencyKind::Requires, DependencyEntry::versioned("glibc", "2.28", 0x0C)),
        (20, DependencyKind::Conflicts, DependencyEntry::new("httpd")),
        (20, DependencyKind::Obsoletes, DependencyEntry::versioned("nginx-mod", "1:1.20", 0x02)),
        (30, DependencyKind::Provides, DependencyEntry::new("orphan")),
    ]
}

/// File rows, in insertion order, for the packages above
pub fn test_files() -> Vec<(i64, &'static str)> {
    vec![
        (10, "/usr/bin/bash"),
        (10, "/usr/share/doc/bash/README"),
        (10, "/etc/skel/.bashrc"),
        (20, "/usr/sbin/nginx"),
        (20, "/usr/lib64/nginx/modules"),
        (30, "/usr/bin/orphan"),
    ]
}

/// Create a test database holding one channel with bash and nginx.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_channel_db() -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("packages.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    let mut conn = db::open(&db_path).unwrap();

    db::transaction(&mut conn, |tx| {
        let mut channel = Channel::new(TEST_CHANNEL.to_string());
        let channel_id = channel.insert(tx)?;

        for pkg in [bash_package(), nginx_package(), orphan_package()] {
            insert_package(tx, &pkg)?;
        }
        Channel::add_package(tx, channel_id, 10)?;
        Channel::add_package(tx, channel_id, 20)?;

        for (package_id, kind, entry) in test_dependencies() {
            CapabilityRow::new(package_id, kind, entry).insert(tx)?;
        }
        for (package_id, path) in test_files() {
            FileEntry::new(package_id, path.to_string()).insert(tx)?;
        }
        Ok(())
    })
    .unwrap();

    (temp_dir, db_path)
}

/// Parse the whole document, failing on any syntax error or unbalanced tag
pub fn assert_well_formed(xml: &str) {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Ok(Event::Empty(_)) if depth == 0 => roots += 1,
            Ok(Event::End(_)) => depth -= 1,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML at {}: {}", reader.buffer_position(), e),
        }
    }

    assert_eq!(depth, 0, "unclosed elements at end of document");
    assert_eq!(roots, 1, "document must have exactly one root element");
}

/// Attributes of every element named `name`, in document order
pub fn attributes_of(xml: &str, name: &str) -> Vec<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == name.as_bytes() => {
                let attrs = e
                    .attributes()
                    .map(|attr| {
                        let attr = attr.unwrap();
                        (
                            String::from_utf8(attr.key.as_ref().to_vec()).unwrap(),
                            attr.unescape_value().unwrap().into_owned(),
                        )
                    })
                    .collect();
                found.push(attrs);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    found
}

/// Unescaped text content of every element named `name`, in document order
pub fn texts_of(xml: &str, name: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == name.as_bytes() => {
                current = Some(String::new());
            }
            Event::Text(t) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&t.unescape().unwrap());
                }
            }
            Event::End(e) if e.name().as_ref() == name.as_bytes() => {
                found.extend(current.take());
            }
            Event::Empty(e) if e.name().as_ref() == name.as_bytes() => {
                found.push(String::new());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    found
}

/// Convenience: attribute pairs as `&str` for comparisons
pub fn pairs(attrs: &[(String, String)]) -> Vec<(&str, &str)> {
    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}
