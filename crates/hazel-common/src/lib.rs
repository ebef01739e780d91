//! # hazel-common
//!
//! Shared utilities including configuration, error handling, session tokens,
//! organization switching, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, MappedResolver, SessionOrganizationSwitcher};
pub use self::config::{
    AppConfig, AppSettings, AuthConfig, ConfigError, DatabaseConfig, Environment, LogConfig,
    SnowflakeConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
