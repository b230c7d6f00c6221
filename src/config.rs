//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export DATABASE_URL="sqlite://shortly.db"
//! export BASE_URL="https://s.example.com"
//! ```
//!
//! ## Variables
//!
//! - `DATABASE_URL` - SQLite connection string (default: `sqlite://shortly.db`)
//! - `STORAGE_BACKEND` - `sqlite` or `memory` (default: `sqlite`)
//! - `BASE_URL` - Public prefix of short URLs (default: `http://127.0.0.1:8000`)
//! - `LISTEN` - Bind address (default: `127.0.0.1:8000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CLICK_QUEUE_CAPACITY` - Click event buffer size (default: 10000, min: 100)
//! - `CLICK_WORKER_CONCURRENCY` - Parallel click increments (default: 4)
//! - `CODE_LENGTH` - Length of generated codes (default: 6)
//! - `MAX_GENERATION_ATTEMPTS` - Candidate draws per allocation (default: 10)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: 30)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::utils::code_generator::{MAX_CUSTOM_CODE_LENGTH, MIN_CUSTOM_CODE_LENGTH};

/// Where short code records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("STORAGE_BACKEND must be 'sqlite' or 'memory', got '{other}'"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub storage_backend: StorageBackend,
    /// Public prefix joined with a code to form the short URL.
    pub base_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub click_queue_capacity: usize,
    /// Maximum number of click increments applied concurrently by the background worker.
    pub click_worker_concurrency: usize,
    pub code_length: usize,
    /// Bound on candidate draws, and on insert race rounds, per shorten call.
    pub max_generation_attempts: usize,

    // ── Pool settings ───────────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 10).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://shortly.db".to_string(),
            storage_backend: StorageBackend::Sqlite,
            base_url: "http://127.0.0.1:8000".to_string(),
            listen_addr: "127.0.0.1:8000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            click_queue_capacity: 10_000,
            click_worker_concurrency: 4,
            code_length: 6,
            max_generation_attempts: 10,
            db_max_connections: 10,
            db_connect_timeout: 30,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `STORAGE_BACKEND` names an unknown backend.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value
                .parse::<StorageBackend>()
                .context("Failed to load storage configuration")?,
            Err(_) => defaults.storage_backend,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            storage_backend,
            base_url: env::var("BASE_URL").unwrap_or(defaults.base_url),
            listen_addr: env::var("LISTEN").unwrap_or(defaults.listen_addr),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            click_queue_capacity: parse_var("CLICK_QUEUE_CAPACITY")
                .unwrap_or(defaults.click_queue_capacity),
            click_worker_concurrency: parse_var("CLICK_WORKER_CONCURRENCY")
                .unwrap_or(defaults.click_worker_concurrency),
            code_length: parse_var("CODE_LENGTH").unwrap_or(defaults.code_length),
            max_generation_attempts: parse_var("MAX_GENERATION_ATTEMPTS")
                .unwrap_or(defaults.max_generation_attempts),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.db_max_connections),
            db_connect_timeout: parse_var("DB_CONNECT_TIMEOUT")
                .unwrap_or(defaults.db_connect_timeout),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first setting that is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.click_queue_capacity < 100 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY must be at least 100, got {}",
                self.click_queue_capacity
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        if self.click_worker_concurrency == 0 || self.click_worker_concurrency > 256 {
            anyhow::bail!(
                "CLICK_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.click_worker_concurrency
            );
        }

        if !(MIN_CUSTOM_CODE_LENGTH..=MAX_CUSTOM_CODE_LENGTH).contains(&self.code_length) {
            anyhow::bail!(
                "CODE_LENGTH must be between {} and {}, got {}",
                MIN_CUSTOM_CODE_LENGTH,
                MAX_CUSTOM_CODE_LENGTH,
                self.code_length
            );
        }

        if self.max_generation_attempts == 0 || self.max_generation_attempts > 100 {
            anyhow::bail!(
                "MAX_GENERATION_ATTEMPTS must be between 1 and 100, got {}",
                self.max_generation_attempts
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        match self.storage_backend {
            StorageBackend::Sqlite => tracing::info!("  Storage: sqlite ({})", self.database_url),
            StorageBackend::Memory => tracing::info!("  Storage: memory (not persisted)"),
        }
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Click queue capacity: {}", self.click_queue_capacity);
        tracing::info!("  Code length: {}", self.code_length);
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DATABASE_URL",
        "STORAGE_BACKEND",
        "BASE_URL",
        "LISTEN",
        "LOG_FORMAT",
        "CLICK_QUEUE_CAPACITY",
        "CLICK_WORKER_CONCURRENCY",
        "CODE_LENGTH",
        "MAX_GENERATION_ATTEMPTS",
        "DB_MAX_CONNECTIONS",
        "DB_CONNECT_TIMEOUT",
    ];

    fn clear_env() {
        // SAFETY: callers are #[serial], so no concurrent access
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.click_queue_capacity = 50;
        assert!(config.validate().is_err());
        config.click_queue_capacity = 10_000;

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "8000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:8000".to_string();

        config.database_url = "postgres://localhost/test".to_string();
        assert!(config.validate().is_err());
        config.database_url = "sqlite::memory:".to_string();
        assert!(config.validate().is_ok());

        config.base_url = "s.example.com".to_string();
        assert!(config.validate().is_err());
        config.base_url = "https://s.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_code_length_bounds() {
        let mut config = Config::default();

        config.code_length = 3;
        assert!(config.validate().is_err());

        config.code_length = 17;
        assert!(config.validate().is_err());

        config.code_length = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_attempts_and_concurrency_bounds() {
        let mut config = Config::default();

        config.max_generation_attempts = 0;
        assert!(config.validate().is_err());
        config.max_generation_attempts = 101;
        assert!(config.validate().is_err());
        config.max_generation_attempts = 1;
        assert!(config.validate().is_ok());

        config.click_worker_concurrency = 0;
        assert!(config.validate().is_err());
        config.click_worker_concurrency = 257;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("sqlite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!("MEMORY".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
        assert_eq!(StorageBackend::Memory.to_string(), "memory");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "sqlite://shortly.db");
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.listen_addr, "127.0.0.1:8000");
        assert_eq!(config.code_length, 6);
        assert_eq!(config.max_generation_attempts, 10);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("STORAGE_BACKEND", "memory");
            env::set_var("BASE_URL", "https://s.example.com/");
            env::set_var("CODE_LENGTH", "8");
            env::set_var("CLICK_QUEUE_CAPACITY", "500");
        }

        let config = load_from_env().unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.base_url, "https://s.example.com/");
        assert_eq!(config.code_length, 8);
        assert_eq!(config.click_queue_capacity, 500);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparsable_number_falls_back_to_default() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("CODE_LENGTH", "six");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.code_length, 6);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_backend_rejected() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("STORAGE_BACKEND", "postgres");
        }

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_from_env_rejects_invalid_values() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("DATABASE_URL", "postgres://localhost/db");
        }

        assert!(load_from_env().is_err());

        clear_env();
    }
}
