// src/repository/config.rs
//! Primary metadata generation settings

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default prefix of `location/@href`
pub const DEFAULT_LOCATION_PREFIX: &str = "getPackage/";

/// Settings controlling the shape of the generated document
///
/// The defaults produce the layout package managers expect from a
/// Spacewalk-style repository. Every field is optional in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryConfig {
    /// Prefix prepended to the package file name in `location/@href`
    pub location_prefix: String,

    /// Pretty-print with this many spaces per level (compact when unset)
    pub indent: Option<usize>,

    /// Emit the `<?xml ...?>` declaration
    pub xml_declaration: bool,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            location_prefix: DEFAULT_LOCATION_PREFIX.to_string(),
            indent: None,
            xml_declaration: true,
        }
    }
}

impl PrimaryConfig {
    /// Parse settings from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }
}
