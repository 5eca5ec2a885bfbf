/**
 * Server Configuration
 *
 * This module loads and validates the server configuration from environment
 * variables. Unlike optional services, configuration is fail-fast: a missing
 * or malformed required variable aborts startup with an error naming the
 * variable, so misconfigured deployments die loudly instead of limping.
 *
 * # Variables
 *
 * | variable | required | default |
 * |----------|----------|---------|
 * | `BASE_URL` | yes | - |
 * | `PORT` | no | `8080` |
 * | `DATABASE_URL` | no | `sqlite:canvelot.db` |
 * | `CORS_ORIGINS` | no | empty |
 * | `STATIC_DIR_PATH` | no | `static` |
 * | `OAUTH_CLIENT_ID` | yes | - |
 * | `OAUTH_CLIENT_SECRET` | yes | - |
 * | `OAUTH_DISCOVERY_URL` | yes | - |
 * | `OAUTH_LOGOUT_REDIRECT_URL` | yes | - |
 * | `AUTH_SECRET` | yes | - |
 */

use std::path::PathBuf;

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set or empty
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// An environment variable is set but its value is unusable
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Server configuration loaded from the environment
///
/// Construct with [`ServerConfig::from_env`]. The struct is cheap to clone
/// and is shared through the application state behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Public base URL of this server (no trailing slash), used to build
    /// the OAuth redirect URI and login redirects
    pub base_url: String,
    /// TCP port to listen on
    pub port: u16,
    /// sqlx database URL
    pub database_url: String,
    /// Allowed CORS origins; empty disables cross-origin access
    pub cors_origins: Vec<String>,
    /// Directory holding the pre-built frontend
    pub static_dir: PathBuf,
    /// OAuth client id registered with the provider
    pub oauth_client_id: String,
    /// OAuth client secret
    pub oauth_client_secret: String,
    /// OIDC discovery document URL
    pub oauth_discovery_url: String,
    /// Where to send the browser after logout
    pub oauth_logout_redirect_url: String,
    /// HMAC secret for session and state tokens
    pub auth_secret: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when a required variable is unset or
    /// empty, and `ConfigError::Invalid` when `PORT` is not a port number or
    /// a URL variable is not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = require_url("BASE_URL")?;

        let port = match std::env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => 8080,
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:canvelot.db".to_string());

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let static_dir = std::env::var("STATIC_DIR_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            port,
            database_url,
            cors_origins,
            static_dir,
            oauth_client_id: require("OAUTH_CLIENT_ID")?,
            oauth_client_secret: require("OAUTH_CLIENT_SECRET")?,
            oauth_discovery_url: require_url("OAUTH_DISCOVERY_URL")?,
            oauth_logout_redirect_url: require_url("OAUTH_LOGOUT_REDIRECT_URL")?,
            auth_secret: require("AUTH_SECRET")?,
        })
    }

    /// The redirect URI registered with the OAuth provider
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/api/auth/callback", self.base_url)
    }
}

/// Read a required variable, rejecting unset and empty values
fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Read a required variable that must be an absolute http(s) URL
fn require_url(name: &'static str) -> Result<String, ConfigError> {
    let value = require(name)?;
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            reason: "must be an absolute http(s) URL".to_string(),
        })
    }
}
