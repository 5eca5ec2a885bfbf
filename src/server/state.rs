/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container, holding:
 * - The SQLite connection pool
 * - The loaded server configuration
 * - The OAuth provider client built at startup
 *
 * There is no other shared mutable state; every request works against the
 * database. Cloning the state is cheap (pool handle plus two `Arc`s).
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::oauth::OAuthClient;
use crate::config::ServerConfig;

/// Shared application state
///
/// # Fields
///
/// * `pool` - SQLite connection pool
/// * `config` - Server configuration loaded at startup
/// * `oauth` - Provider client with discovered endpoints
///
/// # Usage
///
/// ```rust,no_run
/// use axum::extract::State;
/// use canvelot::server::state::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let _pool = &state.pool;
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// OAuth provider client
    pub oauth: Arc<OAuthClient>,
}

/// Allow handlers to extract the pool directly with `State(SqlitePool)`
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

/// Allow handlers to extract the configuration directly
impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

/// Allow handlers to extract the OAuth client directly
impl FromRef<AppState> for Arc<OAuthClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.oauth.clone()
    }
}
