//! CLI subcommands.

pub mod migrate;
pub mod seed;

use sqlx::PgPool;

use cadastro_web::config::{AppConfig, ConfigError};
use cadastro_web::db;

/// Connect to the database named by the environment.
async fn connect() -> Result<PgPool, ConnectError> {
    let config = AppConfig::from_env()?;
    tracing::info!(database = ?config.database, "Connecting to database...");
    Ok(db::create_pool(&config.database).await?)
}

/// Errors that can occur while connecting.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}
