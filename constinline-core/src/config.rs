//! Configuration loading from constinline.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{InlineError, InlineResult, IoResultExt};

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = "constinline.toml";

/// Main configuration structure for constinline.toml.
///
/// Every field is optional; unset fields keep the builder defaults.
/// Relative paths are relative to the project root.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InlineConfig {
    /// Directory scanned for sources
    pub source_dir: Option<String>,
    /// Glob matched against paths relative to `source_dir`
    pub file_pattern: Option<String>,
    /// tsconfig providing `paths` aliases
    pub tsconfig_path: Option<String>,
    /// Directory names pruned while scanning (replaces the defaults)
    pub exclude_dirs: Option<Vec<String>>,
    /// Directory names whose files the hook never rewrites
    pub vendor_dirs: Option<Vec<String>>,
    /// Substitute references to enums declared in the same file
    pub inline_local: Option<bool>,
}

/// Loads configuration from constinline.toml if it exists.
pub fn load_config(root: &Path) -> InlineResult<Option<InlineConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg = toml::from_str(&content)
        .map_err(|e| InlineError::config(&path, format!("Invalid {}: {}", CONFIG_FILE, e)))?;
    Ok(Some(cfg))
}
