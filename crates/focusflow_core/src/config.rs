//! Application configuration.
//!
//! # Responsibility
//! - Describe where task data and logs live and how verbose logging is.
//! - Load overrides from an optional JSON file; missing fields keep defaults.
//!
//! # Invariants
//! - `data_dir` must be non-empty after loading.
//! - `log_level` must be one of `trace|debug|info|warn|error`.

use crate::logging::normalize_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DATA_DIR: &str = ".focusflow";
const DEFAULT_DB_FILE_NAME: &str = "focusflow.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding the store file and, when enabled, rolling logs.
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub log_level: String,
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: crate::logging::default_log_level().to_string(),
            log_to_file: true,
        }
    }
}

impl AppConfig {
    /// Reads and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir cannot be empty".to_string()));
        }
        if self.db_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "db_file_name cannot be empty".to_string(),
            ));
        }
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn missing_fields_keep_defaults() {
        let config = AppConfig::from_json(r#"{ "data_dir": "/tmp/ff" }"#)
            .expect("partial config should load");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/ff"));
        assert_eq!(config.db_file_name, AppConfig::default().db_file_name);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/ff/focusflow.sqlite3"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/ff/logs"));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = AppConfig::from_json(r#"{ "log_level": "loud" }"#)
            .expect_err("bad level should fail");
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("loud")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AppConfig::from_json(r#"{ "theme": "dark" }"#)
            .expect_err("unknown field should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
