//! services/twin/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use diatwin_core::Latency;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where the durable key space lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    File,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "file" | "json" => Some(Self::File),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub storage_path: PathBuf,
    pub log_level: Level,
    pub latency: Latency,
    pub export_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Storage ---
        let backend_str =
            std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());
        let storage_backend = StorageBackend::parse(&backend_str).ok_or_else(|| {
            ConfigError::InvalidValue(
                "STORAGE_BACKEND".to_string(),
                format!("'{}' is not one of sqlite, file, memory", backend_str),
            )
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://diatwin.db?mode=rwc".to_string());
        if storage_backend == StorageBackend::Sqlite && !database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidValue(
                "DATABASE_URL".to_string(),
                "expected a sqlite: url".to_string(),
            ));
        }

        let storage_path = std::env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./diatwin-storage.json"));

        // --- Logging ---
        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Simulated latency ---
        let latency_str =
            std::env::var("SIMULATED_LATENCY").unwrap_or_else(|_| "reference".to_string());
        let latency = match latency_str.trim().to_ascii_lowercase().as_str() {
            "reference" => Latency::reference(),
            "none" | "off" => Latency::none(),
            other => {
                return Err(ConfigError::InvalidValue(
                    "SIMULATED_LATENCY".to_string(),
                    format!("'{}' is not one of reference, none", other),
                ))
            }
        };

        let export_path = std::env::var("EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("diatwin-export.json"));

        Ok(Self {
            storage_backend,
            database_url,
            storage_path,
            log_level,
            latency,
            export_path,
        })
    }
}
