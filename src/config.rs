//! Validator configuration
//!
//! Controls the parts of rule evaluation that the tag syntax leaves open:
//! how `oneof` literals are split and compared, and how text length is
//! measured. Every setting has a default, so an empty JSON object is a
//! valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unit for `minLen`/`maxLen`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// UTF-8 bytes
    Bytes,
    /// Unicode scalar values
    Chars,
}

impl LengthUnit {
    /// Measures `text` in this unit
    pub fn measure(&self, text: &str) -> usize {
        match self {
            LengthUnit::Bytes => text.len(),
            LengthUnit::Chars => text.chars().count(),
        }
    }
}

/// Errors loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The delimiter would split the tag itself
    #[error("'{0}' cannot be used as the oneof delimiter")]
    InvalidDelimiter(char),
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Separator between `oneof` literals (default: '|')
    #[serde(default = "default_enum_delimiter")]
    pub enum_delimiter: char,

    /// Whether `oneof` compares text case sensitively (default: true)
    #[serde(default = "default_enum_case_sensitive")]
    pub enum_case_sensitive: bool,

    /// Unit for length rules (default: bytes)
    #[serde(default = "default_length_unit")]
    pub length_unit: LengthUnit,
}

fn default_enum_delimiter() -> char {
    '|'
}

fn default_enum_case_sensitive() -> bool {
    true
}

fn default_length_unit() -> LengthUnit {
    LengthUnit::Bytes
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            enum_delimiter: default_enum_delimiter(),
            enum_case_sensitive: default_enum_case_sensitive(),
            length_unit: default_length_unit(),
        }
    }
}

impl ValidatorConfig {
    /// Parses a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Rejects settings that can never work with the tag syntax
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.enum_delimiter {
            ',' | '=' => Err(ConfigError::InvalidDelimiter(self.enum_delimiter)),
            _ => Ok(()),
        }
    }
}
