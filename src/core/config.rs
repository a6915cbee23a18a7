//! Configuration management

use crate::core::error::{Error, Result};
use crate::replay::output::OutputFormat;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (ascii, plain, json, dot)
    pub format: String,
    /// Use ANSI colors in ascii output
    pub color: bool,
    /// Labels longer than this are elided in text output (0 = never)
    pub max_label_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory name used when `export` gets no `--out`
    pub dir: PathBuf,
    /// Pretty-print exported JSON
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "ascii".to_string(),
            color: true,
            max_label_width: DEFAULT_MAX_LABEL_WIDTH,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("snapshots"),
            pretty: true,
        }
    }
}

impl OutputConfig {
    /// Parse the configured format name
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format
            .parse::<OutputFormat>()
            .map_err(|message| Error::ConfigError { message })
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file, defaults when missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config.output.output_format()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Write configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = Self::plreplay_home()?;
        Ok(home.join("config.toml"))
    }

    /// Get the plreplay home directory
    pub fn plreplay_home() -> Result<PathBuf> {
        // Check PLREPLAY_HOME env var first
        if let Ok(home) = std::env::var("PLREPLAY_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "plreplay", "plreplay")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine plreplay home directory".to_string(),
            })
    }
}

pub const DEFAULT_MAX_LABEL_WIDTH: usize = 120;
