// src/version/mod.rs

//! Epoch:version-release handling for dependency capabilities
//!
//! Capability rows carry their version as one raw string in the RPM
//! `[epoch:]version[-release]` form. Repository metadata needs the three
//! parts as separate attributes, so this module splits them apart without
//! interpreting or validating any of them.

use std::fmt;

/// An epoch:version-release triple with independently optional parts
///
/// Parts that are absent or empty in the source string are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Evr {
    pub epoch: Option<String>,
    pub version: Option<String>,
    pub release: Option<String>,
}

impl Evr {
    /// Parse a raw EVR string
    ///
    /// Format: [epoch:]version[-release]
    /// Examples:
    /// - "1.2.3" → epoch=None, version="1.2.3", release=None
    /// - "2:1.2.3" → epoch="2", version="1.2.3", release=None
    /// - "1.2-3-4" → epoch=None, version="1.2-3", release="4"
    /// - "2:" → epoch="2", version=None, release=None
    ///
    /// The epoch ends at the first colon, the release starts after the last
    /// dash. Never fails: any input maps to some (possibly empty) triple.
    pub fn parse(s: &str) -> Self {
        let (epoch, rest) = match s.split_once(':') {
            Some((e, r)) => (non_empty(e), r),
            None => (None, s),
        };

        let (version, release) = match rest.rsplit_once('-') {
            Some((v, r)) => (non_empty(v), non_empty(r)),
            None => (non_empty(rest), None),
        };

        Self {
            epoch,
            version,
            release,
        }
    }

    /// Parse an optional raw string, treating `None` like the empty string
    pub fn parse_opt(s: Option<&str>) -> Self {
        s.map(Self::parse).unwrap_or_default()
    }

    /// True when no part carried a value
    pub fn is_empty(&self) -> bool {
        self.epoch.is_none() && self.version.is_none() && self.release.is_none()
    }

    /// Epoch as written into repository metadata
    ///
    /// An explicit epoch wins; a bare version implies epoch "0"; with
    /// neither there is no epoch to report.
    pub fn effective_epoch(&self) -> Option<&str> {
        match (&self.epoch, &self.version) {
            (Some(epoch), _) => Some(epoch.as_str()),
            (None, Some(_)) => Some("0"),
            (None, None) => None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref epoch) = self.epoch {
            write!(f, "{}:", epoch)?;
        }
        if let Some(ref version) = self.version {
            write!(f, "{}", version)?;
        }
        if let Some(ref release) = self.release {
            write!(f, "-{}", release)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evr(epoch: Option<&str>, version: Option<&str>, release: Option<&str>) -> Evr {
        Evr {
            epoch: epoch.map(String::from),
            version: version.map(String::from),
            release: release.map(String::from),
        }
    }

    #[test]
    fn test_parse_version_only() {
        assert_eq!(Evr::parse("1.2.3"), evr(None, Some("1.2.3"), None));
    }

    #[test]
    fn test_parse_with_epoch() {
        assert_eq!(Evr::parse("2:1.0"), evr(Some("2"), Some("1.0"), None));
    }

    #[test]
    fn test_parse_with_release() {
        assert_eq!(Evr::parse("1.0-1"), evr(None, Some("1.0"), Some("1")));
    }

    #[test]
    fn test_parse_full() {
        assert_eq!(
            Evr::parse("1:2.3.4-5.el8"),
            evr(Some("1"), Some("2.3.4"), Some("5.el8"))
        );
    }

    #[test]
    fn test_parse_last_dash_wins() {
        assert_eq!(Evr::parse("1.2-3-4"), evr(None, Some("1.2-3"), Some("4")));
        assert_eq!(
            Evr::parse("0:a-b-1.2.3"),
            evr(Some("0"), Some("a-b"), Some("1.2.3"))
        );
    }

    #[test]
    fn test_parse_first_colon_splits_epoch() {
        assert_eq!(Evr::parse("1:2:3-4"), evr(Some("1"), Some("2:3"), Some("4")));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Evr::parse(""), Evr::default());
        assert!(Evr::parse("").is_empty());
        assert!(Evr::parse_opt(None).is_empty());
    }

    #[test]
    fn test_parse_epoch_alone() {
        let parsed = Evr::parse("2:");
        assert_eq!(parsed, evr(Some("2"), None, None));
        assert_eq!(parsed.effective_epoch(), Some("2"));
    }

    #[test]
    fn test_parse_empty_epoch() {
        // Some rows carry versions like ":1.02.208-2.fc43"
        assert_eq!(
            Evr::parse(":1.02.208-2.fc43"),
            evr(None, Some("1.02.208"), Some("2.fc43"))
        );
    }

    #[test]
    fn test_parse_degenerate_separators() {
        assert!(Evr::parse(":").is_empty());
        assert!(Evr::parse("-").is_empty());
        assert!(Evr::parse(":-").is_empty());
        assert_eq!(Evr::parse("1.0-"), evr(None, Some("1.0"), None));
        assert_eq!(Evr::parse("-1"), evr(None, None, Some("1")));
    }

    fn present(part: Option<&str>) -> Option<&str> {
        part.filter(|p| !p.is_empty())
    }

    #[test]
    fn test_parse_recovers_non_empty_parts() {
        const PARTS: [Option<&str>; 5] = [None, Some(""), Some("0"), Some("1.2.3"), Some("a-b")];

        for epoch in PARTS {
            for version in PARTS {
                for release in PARTS {
                    // A dash in the release, or in a version with nothing
                    // after it, moves the split point
                    let release_has_dash = release.is_some_and(|r| r.contains('-'));
                    let version_dash_unguarded =
                        release.is_none() && version.is_some_and(|v| v.contains('-'));
                    if release_has_dash || version_dash_unguarded {
                        continue;
                    }

                    let mut raw = String::new();
                    if let Some(e) = epoch {
                        raw.push_str(e);
                        raw.push(':');
                    }
                    raw.push_str(version.unwrap_or(""));
                    if let Some(r) = release {
                        raw.push('-');
                        raw.push_str(r);
                    }

                    assert_eq!(
                        Evr::parse(&raw),
                        evr(present(epoch), present(version), present(release)),
                        "parsing {raw:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_effective_epoch() {
        assert_eq!(Evr::parse("1.0").effective_epoch(), Some("0"));
        assert_eq!(Evr::parse("3:1.0").effective_epoch(), Some("3"));
        assert_eq!(Evr::parse("").effective_epoch(), None);
        // Release without version still reports no epoch
        assert_eq!(Evr::parse("-1").effective_epoch(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Evr::parse("2:1.2.3-4.el8").to_string(), "2:1.2.3-4.el8");
        assert_eq!(Evr::parse("1.2.3").to_string(), "1.2.3");
    }
}
