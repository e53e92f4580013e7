//! CLI configuration.
//!
//! Values come from, lowest to highest precedence:
//! 1. Defaults
//! 2. A YAML file given with `--config`
//! 3. `REDWIRE_STRICT` and `REDWIRE_LIBRARY` environment variables
//! 4. Command-line flags

use std::path::{Path, PathBuf};

use redwire_compile::TrimOptions;
use redwire_hdl::HdlOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reject argument count and width mismatches.
    pub strict: bool,

    /// Optimizer passes to run.
    pub trim: TrimOptions,

    /// Directories searched for `<circuit>.rw` files.
    pub library: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: true,
            trim: TrimOptions::default(),
            library: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load the file if given, apply environment overrides, and validate.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from environment variables looked up with `var`.
    ///
    /// Only variables that are set override the current values.
    pub fn merge_env(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = var("REDWIRE_STRICT") {
            self.strict = parse_flag(&v).ok_or_else(|| {
                ConfigError::ValidationError(format!("Invalid REDWIRE_STRICT value: {v}"))
            })?;
        }
        if let Some(v) = var("REDWIRE_LIBRARY") {
            self.library = v
                .split(':')
                .filter(|entry| !entry.is_empty())
                .map(PathBuf::from)
                .collect();
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for dir in &self.library {
            if !dir.is_dir() {
                return Err(ConfigError::ValidationError(format!(
                    "Library path is not a directory: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Compiler options derived from this configuration.
    pub fn hdl_options(&self) -> HdlOptions {
        HdlOptions {
            strict: self.strict,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
