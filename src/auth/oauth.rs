/**
 * OAuth2 / OIDC Provider Client
 *
 * This module is the thin integration with the external identity provider:
 * endpoint discovery at startup, the authorization redirect URL, the
 * code-for-token exchange, and the userinfo fetch. It deliberately stops
 * there; sessions and user records are handled by the sibling modules.
 *
 * # Login Flow
 *
 * 1. `GET /api/auth/login` builds the authorization URL with a random
 *    `state`, remembered in a short-lived signed cookie.
 * 2. The provider redirects back to `/api/auth/callback?code&state`.
 * 3. The callback verifies the state cookie, exchanges the code, fetches
 *    the userinfo profile, and maps it to a [`UserProfile`].
 *
 * # Profile Mapping
 *
 * Username comes from `preferred_username` falling back to `nickname`,
 * display name from `given_name` falling back to `name`, and the initial
 * role is admin when any `groups` entry contains `"Admin"`. The role only
 * matters on first login; afterwards the stored role wins.
 */

use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Name of the cookie holding the signed OAuth state during a login
pub const STATE_COOKIE: &str = "canvelot_oauth_state";

/// How long a login attempt may take before its state expires
const STATE_TTL_SECS: i64 = 600;

/// OAuth integration errors
#[derive(Debug, Error)]
pub enum OAuthError {
    /// A request to the provider failed (discovery, token, or userinfo)
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The discovered authorization endpoint is not a usable URL
    #[error("invalid authorization endpoint: {0}")]
    InvalidEndpoint(String),

    /// The userinfo profile lacks a claim we cannot do without
    #[error("provider profile is missing the {0} claim")]
    MissingClaim(&'static str),
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::Request(e) => ApiError::Provider(e),
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Endpoints from the provider's OIDC discovery document
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    /// Where to send the browser to authorize
    pub authorization_endpoint: String,
    /// Where to exchange the authorization code
    pub token_endpoint: String,
    /// Where to fetch the user profile
    pub userinfo_endpoint: String,
}

/// Client for the configured OAuth provider
///
/// Built once at startup by [`OAuthClient::discover`] and shared through the
/// application state. Cloning is cheap; the inner `reqwest::Client` is a
/// handle to a shared connection pool.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    metadata: ProviderMetadata,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

/// Token endpoint response; only the access token is needed
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for the userinfo request
    pub access_token: String,
}

/// Raw userinfo claims as the provider returns them
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Stable subject identifier
    pub sub: String,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Provider profile mapped to the fields the user table stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub subject: String,
    pub username: String,
    pub name: String,
    pub email: String,
    /// Whether the provider's groups grant the admin role on first login
    pub admin: bool,
}

impl UserInfo {
    /// Map raw claims to a [`UserProfile`]
    ///
    /// # Errors
    ///
    /// `MissingClaim` when neither username claim, neither name claim, or no
    /// email is present. Accounts cannot be created without these.
    pub fn into_profile(self) -> Result<UserProfile, OAuthError> {
        let username = self
            .preferred_username
            .or(self.nickname)
            .ok_or(OAuthError::MissingClaim("preferred_username"))?;
        let name = self
            .given_name
            .or(self.name)
            .ok_or(OAuthError::MissingClaim("name"))?;
        let email = self.email.ok_or(OAuthError::MissingClaim("email"))?;
        let admin = self.groups.iter().any(|group| group.contains("Admin"));

        Ok(UserProfile {
            subject: self.sub,
            username,
            name,
            email,
            admin,
        })
    }
}

impl OAuthClient {
    /// Fetch the provider's discovery document and build the client
    ///
    /// Called once at startup; a provider that cannot be reached is a fatal
    /// configuration problem, not something to limp past.
    ///
    /// # Arguments
    /// * `config` - Server configuration with the discovery URL and credentials
    pub async fn discover(config: &ServerConfig) -> Result<Self, OAuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        tracing::info!(url = %config.oauth_discovery_url, "fetching OAuth discovery document");

        let metadata: ProviderMetadata = http
            .get(&config.oauth_discovery_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::info!(
            authorization = %metadata.authorization_endpoint,
            token = %metadata.token_endpoint,
            userinfo = %metadata.userinfo_endpoint,
            "OAuth provider endpoints discovered"
        );

        Ok(Self {
            http,
            metadata,
            client_id: config.oauth_client_id.clone(),
            client_secret: config.oauth_client_secret.clone(),
            redirect_uri: config.oauth_redirect_uri(),
        })
    }

    /// Build the authorization URL for a login attempt
    ///
    /// # Arguments
    /// * `state` - Random state value, also remembered in the state cookie
    pub fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
        let url = reqwest::Url::parse_with_params(
            &self.metadata.authorization_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", "openid profile email"),
                ("state", state),
            ],
        )
        .map_err(|e| OAuthError::InvalidEndpoint(e.to_string()))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError> {
        let response = self
            .http
            .post(&self.metadata.token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        Ok(response)
    }

    /// Fetch the userinfo profile with an access token
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, OAuthError> {
        let info = self
            .http
            .get(&self.metadata.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<UserInfo>()
            .await?;

        Ok(info)
    }
}

/// Claims carried by the state cookie during a login attempt
#[derive(Debug, Serialize, Deserialize)]
pub struct StateClaims {
    /// Random state echoed by the provider
    pub state: String,
    /// Path to return the browser to after the callback
    pub redirect: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Sign a state cookie token for a login attempt
pub fn issue_state_token(
    secret: &str,
    state: &str,
    redirect: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = StateClaims {
        state: state.to_string(),
        redirect: redirect.to_string(),
        exp: (chrono::Utc::now().timestamp() + STATE_TTL_SECS).max(0) as u64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

/// Verify and decode a state cookie token
pub fn verify_state_token(
    secret: &str,
    token: &str,
) -> Result<StateClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<StateClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}
