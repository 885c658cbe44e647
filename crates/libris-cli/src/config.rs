//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use libris_domain::DEFAULT_LOAN_DAYS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display settings
    #[serde(default)]
    pub settings: Settings,

    /// Defaults applied to lending input
    #[serde(default)]
    pub lending: LendingSettings,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Fallbacks for blank or malformed numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingSettings {
    /// Loan period when none (or garbage) is entered
    #[serde(default = "default_loan_days")]
    pub default_loan_days: u32,

    /// Copies cataloged when none (or garbage) is entered
    #[serde(default = "default_quantity")]
    pub default_quantity: u32,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (keys only) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(libris_home()?.join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: default_history_size(),
        }
    }
}

impl Default for LendingSettings {
    fn default() -> Self {
        Self {
            default_loan_days: DEFAULT_LOAN_DAYS,
            default_quantity: default_quantity(),
        }
    }
}

/// `~/.libris`, home of the config and history files.
pub fn libris_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".libris"))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_loan_days() -> u32 {
    DEFAULT_LOAN_DAYS
}

fn default_quantity() -> u32 {
    1
}
