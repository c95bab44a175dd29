//! Configuration system for deepquill.
//!
//! This module provides the configuration structure for the `deepquill` tool
//! with sensible defaults and support for serialization/deserialization via
//! serde. Configuration is loaded from a TOML file and merged with
//! command-line arguments.
//!
//! # Example
//!
//! ```
//! use deepquill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.indent_size, 2);
//! assert!(config.flatten_results);
//!
//! // Create custom configuration
//! let custom = Config {
//!     indent_size: 4,
//!     ..Config::default()
//! };
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the deepquill tool.
///
/// All fields have sensible defaults via `Config::default()`, and any field
/// missing from the config file falls back to its default.
///
/// # Fields
///
/// * `indent_size` - Spaces per indentation level in printed output (default: 2)
/// * `flatten_results` - Print `get` results as one flat list (default: true)
/// * `log_level` - Default tracing filter when `RUST_LOG` is unset (default: "warn")
/// * `create_backup` - Create .bak files before overwriting (default: false)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per indentation level in printed output
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Print `get` results as one flat list instead of the nested search shape
    #[serde(default = "default_flatten_results")]
    pub flatten_results: bool,

    /// Default tracing filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Create .bak files before overwriting
    #[serde(default)]
    pub create_backup: bool,
}

/// Returns the default indentation size.
fn default_indent_size() -> usize {
    2
}

fn default_flatten_results() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            flatten_results: default_flatten_results(),
            log_level: default_log_level(),
            create_backup: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/deepquill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("deepquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
