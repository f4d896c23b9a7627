//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_CLEANUP_INTERVAL_SECONDS, DEFAULT_EMPTY_ROOM_MINUTES, DEFAULT_EXECUTION_TIMEOUT_MS,
    DEFAULT_MAX_SESSION_MINUTES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub execution: ExecutionConfig,
    pub catalog: CatalogConfig,
    pub rooms: RoomConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Execution service configuration
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Base URL of the external code-execution service
    pub url: String,
    /// Per-test-case execution timeout in milliseconds
    pub timeout_ms: u64,
}

/// Problem catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the problem catalog service
    pub url: String,
}

/// Room lifecycle configuration
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Active sessions older than this are deleted by the sweeper (minutes)
    pub max_session_minutes: i64,
    /// Rooms empty for longer than this are deleted by the sweeper (minutes)
    pub empty_room_minutes: i64,
    /// Interval between cleanup sweeps (seconds)
    pub cleanup_interval_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            execution: ExecutionConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
            rooms: RoomConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl ExecutionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("EXECUTION_URL")
                .map_err(|_| ConfigError::Missing("EXECUTION_URL".to_string()))?,
            timeout_ms: env::var("EXECUTION_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_EXECUTION_TIMEOUT_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("EXECUTION_TIMEOUT_MS".to_string()))?,
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("CATALOG_URL")
                .map_err(|_| ConfigError::Missing("CATALOG_URL".to_string()))?,
        })
    }
}

impl RoomConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_session_minutes: env::var("ROOM_MAX_SESSION_MINUTES")
                .unwrap_or_else(|_| DEFAULT_MAX_SESSION_MINUTES.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ROOM_MAX_SESSION_MINUTES".to_string()))?,
            empty_room_minutes: env::var("ROOM_EMPTY_MINUTES")
                .unwrap_or_else(|_| DEFAULT_EMPTY_ROOM_MINUTES.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ROOM_EMPTY_MINUTES".to_string()))?,
            cleanup_interval_seconds: env::var("ROOM_CLEANUP_INTERVAL_SECONDS")
                .unwrap_or_else(|_| DEFAULT_CLEANUP_INTERVAL_SECONDS.to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("ROOM_CLEANUP_INTERVAL_SECONDS".to_string())
                })?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // Test that defaults are applied when env vars are not set
        let rooms = RoomConfig {
            max_session_minutes: DEFAULT_MAX_SESSION_MINUTES,
            empty_room_minutes: DEFAULT_EMPTY_ROOM_MINUTES,
            cleanup_interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
        };
        assert_eq!(rooms.max_session_minutes, 180);
        assert_eq!(rooms.empty_room_minutes, 15);
        assert_eq!(rooms.cleanup_interval_seconds, 60);
    }
}
