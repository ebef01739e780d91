//! Apply the SQL migrations to the configured database

use std::path::Path;

use hazel_common::{try_init_tracing_with_config, AppConfig, AppError, AppResult, TracingConfig};
use hazel_db::{create_pool, run_migrations, PoolOptions};
use tracing::info;

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = AppConfig::load()?;
    try_init_tracing_with_config(&TracingConfig::from(&config.log)).map_err(AppError::internal)?;

    info!(app = %config.app.name, env = ?config.app.env, "Running migrations");

    let pool = create_pool(&PoolOptions::from(&config.database))
        .await
        .map_err(AppError::database)?;
    run_migrations(&pool, Path::new(&config.database.migrations_dir))
        .await
        .map_err(AppError::database)?;

    info!("Migrations applied");
    pool.close().await;
    Ok(())
}
