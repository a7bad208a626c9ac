//! Name-override configuration loading.
//!
//! The override mapping started life as an ad-hoc patch list in code; it is
//! now a versioned TOML document so the name-resolution policy can be
//! audited and tested independently of the pipeline. A sample file ships at
//! the repository root as `name_overrides.toml`:
//!
//! ```toml
//! version = 1
//!
//! [[override]]
//! code = "VEN"
//! name = "Venezuela"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::model::AnalyticsError;

/// The only override-file version this build understands.
pub const SUPPORTED_OVERRIDE_VERSION: u32 = 1;

/// A parsed override configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideFile {
    pub version: u32,
    #[serde(default, rename = "override")]
    pub overrides: Vec<OverrideEntry>,
}

/// One code → display-name override entry.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideEntry {
    pub code: String,
    pub name: String,
}

/// Loads and validates an override file.
///
/// Fails if the file cannot be read, is not valid TOML, or declares a
/// version other than `SUPPORTED_OVERRIDE_VERSION`. An empty override list
/// is valid.
pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<OverrideFile, AnalyticsError> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| AnalyticsError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
    parse_overrides(&text)
}

/// Parses override TOML from a string. Split out from `load_overrides` so
/// the format can be tested without touching the filesystem.
pub fn parse_overrides(text: &str) -> Result<OverrideFile, AnalyticsError> {
    let file: OverrideFile =
        toml::from_str(text).map_err(|e| AnalyticsError::Config(e.to_string()))?;
    if file.version != SUPPORTED_OVERRIDE_VERSION {
        return Err(AnalyticsError::Config(format!(
            "unsupported override file version {} (expected {})",
            file.version, SUPPORTED_OVERRIDE_VERSION
        )));
    }
    Ok(file)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
