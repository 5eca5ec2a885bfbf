//! Full-application test fixture
//!
//! Builds the real router over an in-memory database, a temporary static
//! directory, and a wiremock OAuth provider, then wraps it in an
//! `axum_test::TestServer`. Everything a test changes dies with the
//! fixture.

use std::sync::Arc;

use axum::http::header::SET_COOKIE;
use axum_test::{TestResponse, TestServer};
use sqlx::SqlitePool;
use tempfile::TempDir;
use wiremock::MockServer;

use canvelot::auth::oauth::OAuthClient;
use canvelot::auth::User;
use canvelot::config::ServerConfig;
use canvelot::routes::create_router;
use canvelot::server::AppState;

use crate::common::auth_helpers::{create_test_user, session_cookie, TEST_AUTH_SECRET};
use crate::common::database::create_test_pool;
use crate::common::mock_oauth::start_provider;

/// A fully wired application instance for one test
pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    pub provider: MockServer,
    pub config: Arc<ServerConfig>,
    // Held so ServeDir's directory outlives the test
    _static_dir: TempDir,
}

impl TestApp {
    /// Spawn the application against fresh fixtures
    pub async fn spawn() -> Self {
        let provider = start_provider().await;
        let pool = create_test_pool().await;

        let static_dir = TempDir::new().expect("Failed to create static dir");
        std::fs::write(
            static_dir.path().join("index.html"),
            "<!doctype html><title>canvelot</title>",
        )
        .expect("Failed to write index.html");

        let config = Arc::new(ServerConfig {
            base_url: "http://localhost:8080".to_string(),
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            static_dir: static_dir.path().to_path_buf(),
            oauth_client_id: "canvelot-test".to_string(),
            oauth_client_secret: "canvelot-test-secret".to_string(),
            oauth_discovery_url: format!("{}/.well-known/openid-configuration", provider.uri()),
            oauth_logout_redirect_url: format!("{}/end-session", provider.uri()),
            auth_secret: TEST_AUTH_SECRET.to_string(),
        });

        let oauth = OAuthClient::discover(&config)
            .await
            .expect("Failed to discover mock provider");

        let state = AppState {
            pool: pool.clone(),
            config: config.clone(),
            oauth: Arc::new(oauth),
        };

        let server = TestServer::new(create_router(state)).expect("Failed to build test server");

        Self {
            server,
            pool,
            provider,
            config,
            _static_dir: static_dir,
        }
    }

    /// Create a user with an active session; returns the user and the
    /// `Cookie` header value that authenticates as them
    pub async fn login_as(&self, username: &str, role: &str) -> (User, String) {
        let user = create_test_user(&self.pool, username, role).await;
        let cookie = session_cookie(&self.pool, &user).await;
        (user, cookie)
    }

    /// Path to the static directory served by this instance
    pub fn static_path(&self) -> &std::path::Path {
        self._static_dir.path()
    }
}

/// Pull a `name=value` pair out of a response's Set-Cookie headers
pub fn extract_cookie(response: &TestResponse, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .iter_headers_by_name(SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(|value| value.split(';').next().unwrap_or(value).to_string())
}
