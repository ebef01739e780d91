//! PostgreSQL connection pool and migrations

use std::path::Path;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use hazel_common::config::DatabaseConfig;

/// Pool tuning derived from [`DatabaseConfig`]
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl From<&DatabaseConfig> for PoolOptions {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Create a new PostgreSQL connection pool
pub async fn create_pool(options: &PoolOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(options.max_connections)
        .min_connections(options.min_connections)
        .acquire_timeout(options.acquire_timeout)
        .idle_timeout(options.idle_timeout)
        .max_lifetime(options.max_lifetime)
        .connect(&options.url)
        .await
}

/// Apply the SQL migrations found in `dir`
pub async fn run_migrations(pool: &PgPool, dir: &Path) -> Result<(), MigrateError> {
    let migrator = Migrator::new(dir.to_path_buf()).await?;
    info!(
        dir = %dir.display(),
        count = migrator.iter().count(),
        "Applying migrations"
    );
    migrator.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = DatabaseConfig {
            url: "postgresql://localhost/hazel".to_string(),
            max_connections: 8,
            min_connections: 2,
            acquire_timeout_secs: 5,
            migrations_dir: "migrations".to_string(),
        };
        let options = PoolOptions::from(&config);

        assert_eq!(options.url, "postgresql://localhost/hazel");
        assert_eq!(options.max_connections, 8);
        assert_eq!(options.min_connections, 2);
        assert_eq!(options.acquire_timeout, Duration::from_secs(5));
    }
}
