//! Runtime configuration loaded from the environment.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::db::DEFAULT_STORAGE_KEY;

const DB_PATH_VAR: &str = "VET_INTAKE_DB_PATH";
const STORAGE_KEY_VAR: &str = "VET_INTAKE_STORAGE_KEY";
const LOG_LEVEL_VAR: &str = "VET_INTAKE_LOG_LEVEL";

const DEFAULT_DB_PATH: &str = "vet_intake.db";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    Empty(&'static str),
}

/// Settings controlling the tracing subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Top-level configuration for the intake core.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Key the snapshot is stored under
    pub storage_key: String,
    pub telemetry: TelemetryConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            telemetry: TelemetryConfig {
                log_level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}

impl CoreConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str, default: &str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(key)),
                Some(value) => Ok(value.trim().to_string()),
                None => Ok(default.to_string()),
            }
        };

        Ok(Self {
            database_path: PathBuf::from(read(DB_PATH_VAR, DEFAULT_DB_PATH)?),
            storage_key: read(STORAGE_KEY_VAR, DEFAULT_STORAGE_KEY)?,
            telemetry: TelemetryConfig {
                log_level: read(LOG_LEVEL_VAR, DEFAULT_LOG_LEVEL)?,
            },
        })
    }
}
