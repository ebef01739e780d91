//! Application configuration structs
//!
//! Loads configuration from an optional TOML file, then `HAZEL_`-prefixed
//! environment variables (`HAZEL_DATABASE__URL` sets `database.url`).

use std::env;

use hazel_core::value_objects::{SnowflakeConfigError, SnowflakeGenerator};
use serde::Deserialize;

/// File read when `HAZEL_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "config/hazel.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_VAR: &str = "HAZEL_CONFIG";

const ENV_PREFIX: &str = "HAZEL";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub snowflake: SnowflakeConfig,
    /// Only needed by components that issue session tokens
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub log: LogConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

impl SnowflakeConfig {
    /// Build the id generator for this worker
    pub fn generator(&self) -> Result<SnowflakeGenerator, SnowflakeConfigError> {
        SnowflakeGenerator::new(self.worker_id)
    }
}

/// Session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "hazel".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_migrations_dir() -> String {
    "crates/hazel-db/migrations".to_string()
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from `.env`, the config file, and the environment
    ///
    /// # Errors
    /// Returns an error if a required value is missing or a value is invalid
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(&path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML alone, ignoring the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "database.url",
                "must not be empty".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "database.min_connections",
                format!(
                    "{} exceeds max_connections {}",
                    self.database.min_connections, self.database.max_connections
                ),
            ));
        }
        if let Err(e) = self.snowflake.generator() {
            return Err(ConfigError::InvalidValue("snowflake.worker_id", e.to_string()));
        }
        if let Some(auth) = &self.auth {
            if auth.jwt_secret.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "auth.jwt_secret",
                    "must not be empty".to_string(),
                ));
            }
            if auth.access_token_expiry <= 0 {
                return Err(ConfigError::InvalidValue(
                    "auth.access_token_expiry",
                    "must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The `[auth]` section, for callers that issue session tokens
    ///
    /// # Errors
    /// Returns an error if the section is absent
    pub fn auth(&self) -> Result<&AuthConfig, ConfigError> {
        self.auth.as_ref().ok_or_else(|| {
            ConfigError::InvalidValue("auth", "section is required to issue tokens".to_string())
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
