//! Core configuration values.
//!
//! # Responsibility
//! - Carry the key-derivation salt as an explicit value.
//! - Describe where the database and logs live for embedding callers.
//!
//! # Invariants
//! - There is no process-wide salt; every key derivation receives a `KeySalt`.
//! - A salt is never empty.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Salt used by the historical deployment; keeps existing profile URLs stable.
pub const DEFAULT_KEY_SALT: &str = "Contributing!";

/// Salt appended to identity strings before hashing them into user keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySalt(String);

impl KeySalt {
    /// Creates a salt, rejecting empty values.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ConfigError::EmptySalt);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KeySalt {
    fn default() -> Self {
        Self(DEFAULT_KEY_SALT.to_string())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Input is not valid JSON for `CoreConfig`.
    Parse(serde_json::Error),
    /// Salt value is empty.
    EmptySalt,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid core config: {err}"),
            Self::EmptySalt => write!(f, "key salt cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::EmptySalt => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level configuration for embedding the core in a host process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Salt for user key derivation.
    pub salt: KeySalt,
    /// SQLite file path. `None` means an in-memory database.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            salt: KeySalt::default(),
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parses configuration from JSON; missing fields take defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        if config.salt.as_str().is_empty() {
            return Err(ConfigError::EmptySalt);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, KeySalt, DEFAULT_KEY_SALT};

    #[test]
    fn default_salt_matches_historical_value() {
        assert_eq!(KeySalt::default().as_str(), DEFAULT_KEY_SALT);
    }

    #[test]
    fn key_salt_rejects_empty_value() {
        assert!(matches!(KeySalt::new(""), Err(ConfigError::EmptySalt)));
    }

    #[test]
    fn from_json_fills_missing_fields_with_defaults() {
        let config = CoreConfig::from_json_str(r#"{"salt":"pepper"}"#).unwrap();
        assert_eq!(config.salt.as_str(), "pepper");
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_dir, None);
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn from_json_rejects_empty_salt() {
        let err = CoreConfig::from_json_str(r#"{"salt":""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySalt));
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let err = CoreConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
