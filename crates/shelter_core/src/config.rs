//! Runtime configuration for the shelter registry.
//!
//! # Responsibility
//! - Load database and logging settings from an optional TOML file.
//! - Resolve defaults and relative paths into concrete runtime values.
//!
//! # Invariants
//! - Every field is optional; a missing file section means defaults.
//! - Resolved log directories are absolute.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Database file used when neither config nor CLI names one.
pub const DEFAULT_DB_FILE_NAME: &str = "shelter.sqlite3";
/// Log directory (relative to the working directory) used by default.
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite file path. Relative paths resolve against the working directory.
    pub path: Option<PathBuf>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShelterConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl ShelterConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Database path, falling back to [`DEFAULT_DB_FILE_NAME`].
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME))
    }

    /// Log level, falling back to the build-mode default.
    pub fn log_level(&self) -> String {
        self.logging
            .level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string())
    }

    /// Absolute log directory; relative values are joined onto `cwd`.
    pub fn log_dir(&self, cwd: &Path) -> PathBuf {
        let dir = self
            .logging
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR_NAME));
        if dir.is_absolute() {
            dir
        } else {
            cwd.join(dir)
        }
    }
}
