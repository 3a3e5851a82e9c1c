//! Composition configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. Explicit config file (--config)
//! 3. Project-level (class-traits.toml in the working directory)
//! 4. Default values
//! ```
//!
//! # File format
//!
//! ```toml
//! [identity]
//! strategy = "source-text"   # or "per-declaration"
//!
//! [log]
//! level = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::{Declarer, IdentityStrategy};
use crate::util::logger::LogLevel;

/// Project-level config file name
pub const CONFIG_FILE_NAME: &str = "class-traits.toml";

/// Composition configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ComposeConfig {
    /// Trait identity settings
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Identity configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IdentityConfig {
    /// How declarations obtain their identifier
    #[serde(default)]
    pub strategy: IdentityStrategy,
}

/// Log configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level emitted
    #[serde(default)]
    pub level: LogLevel,
}

impl ComposeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::ParseError)
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Load from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` if given, else from the project-level file in `dir`
    /// if present, else defaults
    pub fn discover(
        path: Option<&Path>,
        dir: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let project = project_config_path(dir);
        if project.exists() {
            Self::load(&project)
        } else {
            Ok(Self::default())
        }
    }

    /// Declaration front-end honouring the configured identity strategy
    pub fn declarer(&self) -> Declarer {
        Declarer::new(self.identity.strategy)
    }
}

/// Path of the project-level config file in `dir`
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {}", .path.display(), .source)]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Config serialize error: {0}")]
    SerializeError(toml::ser::Error),
}
