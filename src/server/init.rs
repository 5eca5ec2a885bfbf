/**
 * Server Initialization
 *
 * This module wires the application together at startup:
 *
 * 1. Open the SQLite pool, creating the database file on first run
 * 2. Apply pending migrations
 * 3. Discover the OAuth provider's endpoints
 * 4. Build the application state and the router
 *
 * Unlike request handling, startup is fail-fast: a missing database
 * directory, a broken migration, or an unreachable OAuth provider stops
 * the process with a clear error instead of limping along.
 */

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::auth::oauth::{OAuthClient, OAuthError};
use crate::config::ServerConfig;
use crate::routes::create_router;
use crate::server::state::AppState;

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum InitError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("OAuth provider discovery failed: {0}")]
    Discovery(#[from] OAuthError),
}

/// Open the connection pool and bring the schema up to date
///
/// The database file is created when it does not exist yet. Foreign keys
/// are switched on per connection; the membership and session tables rely
/// on `ON DELETE CASCADE`.
///
/// # Arguments
///
/// * `database_url` - SQLite URL, e.g. `sqlite:canvelot.db`
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, InitError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(database_url = %database_url, "database ready");

    Ok(pool)
}

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `config` - Validated server configuration
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated, or when the OAuth
/// provider's discovery document cannot be fetched.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, InitError> {
    let pool = connect_database(&config.database_url).await?;

    let oauth = OAuthClient::discover(&config).await?;

    let state = AppState {
        pool,
        config: Arc::new(config),
        oauth: Arc::new(oauth),
    };

    Ok(create_router(state))
}
