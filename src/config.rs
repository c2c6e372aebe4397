//! Configuration file support for the event log parser.
//!
//! Loads settings from `~/.config/event-log-parser/config.toml` on Linux
//! (or platform-appropriate location on other OSes).

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::event::DAMAGE_EVENT_TYPE;
use crate::export::{CsvExporter, CsvQuoting, DEFAULT_EXPORT_FILE};
use crate::filter::RowFilter;

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("damage_type must not be empty")]
    EmptyDamageType,

    #[error("damage_type '{0}' contains a space and can never match an event type")]
    DamageTypeWithSpace(String),

    #[error("export_file must not be empty")]
    EmptyExportFile,
}

/// How statistics are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON document
    Json,
    /// Prometheus text exposition
    Prometheus,
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event type whose last detail carries a damage amount.
    pub damage_type: String,

    /// File name for CSV exports.
    pub export_file: String,

    /// Write the header row on export.
    pub include_header: bool,

    /// Cell escaping on export.
    pub csv_quoting: CsvQuoting,

    /// Default search term applied to the table.
    pub search: Option<RowFilter>,

    /// Statistics output format.
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damage_type: DAMAGE_EVENT_TYPE.to_string(),
            export_file: DEFAULT_EXPORT_FILE.to_string(),
            include_header: true,
            csv_quoting: CsvQuoting::Never,
            search: None,
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("event-log-parser/config.toml"))
    }

    /// Validate all configuration settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.damage_type.is_empty() {
            return Err(ConfigError::EmptyDamageType);
        }
        if self.damage_type.contains(' ') {
            return Err(ConfigError::DamageTypeWithSpace(self.damage_type.clone()));
        }
        if self.export_file.trim().is_empty() {
            return Err(ConfigError::EmptyExportFile);
        }
        Ok(())
    }

    /// Export settings derived from this config.
    pub fn exporter(&self) -> CsvExporter {
        CsvExporter {
            quoting: self.csv_quoting,
            include_header: self.include_header,
        }
    }
}
