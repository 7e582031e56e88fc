//! vhand.toml configuration
//!
//! Looked up in this order: `--config <path>`, `./vhand.toml`, the platform config
//! directory, then built-in defaults.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vector_hand::Layout;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "vhand.toml";

/// vhand.toml structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VhandConfig {
    pub codec: CodecSection,
    pub output: OutputSection,
}

/// Codec section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSection {
    /// Record layout for new streams: "framed" or "compact".
    /// Default: framed
    pub layout: Layout,
}

/// Output section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Pretty-print JSON written by `decode` and `sample`.
    /// Default: true
    pub pretty: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl VhandConfig {
    /// Render as TOML (used by `vhand init`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Parse a config file
pub fn load_config(path: &Path) -> Result<VhandConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Platform config file location, if the platform has one
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "vector-hand", "vhand")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Find and load the effective config
///
/// An explicit path must exist; the fallbacks are skipped when missing.
pub fn resolve_config(explicit: Option<&Path>, working_dir: &Path) -> Result<VhandConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        tracing::debug!("Using config {}", path.display());
        return load_config(path);
    }

    let candidates = std::iter::once(working_dir.join(CONFIG_FILE_NAME)).chain(user_config_path());
    for path in candidates {
        if path.exists() {
            tracing::debug!("Using config {}", path.display());
            return load_config(&path);
        }
    }

    tracing::debug!("No config file found, using defaults");
    Ok(VhandConfig::default())
}
