//! Configuration management for the nslog CLI
//!
//! Values come from, in order of precedence: command-line flags, environment
//! variables (handled by clap), the config file, and built-in defaults.

use anyhow::{Context, Result};
use nslog::record::DEFAULT_SEPARATOR;
use nslog::{Boundary, DecodeOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub separator: Option<String>,
    pub format: Option<OutputFormat>,
    pub legacy_boundary: Option<bool>,
    pub strict: Option<bool>,
    pub user_keys: Option<bool>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("nslog");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Effective settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub separator: String,
    pub format: OutputFormat,
    pub options: DecodeOptions,
}

impl Settings {
    /// Merge command-line values over the config file
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let separator = cli
            .separator
            .clone()
            .or_else(|| config.separator.clone())
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string());

        let format = cli.format.or(config.format).unwrap_or_default();

        let legacy = cli.legacy_boundary || config.legacy_boundary.unwrap_or(false);
        let boundary = if legacy {
            Boundary::Legacy
        } else {
            Boundary::Exact
        };

        let options = DecodeOptions::new()
            .boundary(boundary)
            .strict_frame_size(cli.strict || config.strict.unwrap_or(false))
            .user_defined_keys(cli.user_keys || config.user_keys.unwrap_or(false));

        Self {
            separator,
            format,
            options,
        }
    }
}
