/**
 * Authentication Handlers
 *
 * HTTP handlers for the login flow and the session endpoints:
 *
 * - `GET /api/auth/login` - start the OAuth flow (public)
 * - `GET /api/auth/callback` - provider redirect target (public)
 * - `GET /api/authentication/logout` - revoke the session
 * - `GET /api/authentication/is-current-user-admin` - role probe for the UI
 *
 * # Security
 *
 * The login handler sets a signed, short-lived state cookie; the callback
 * only proceeds when the provider echoes the same state back. Both the
 * state cookie and the session cookie are HttpOnly and SameSite=Lax. The
 * return-to path is restricted to same-origin absolute paths.
 */

use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::auth::oauth::{issue_state_token, verify_state_token, STATE_COOKIE};
use crate::auth::sessions::{
    create_session, delete_session, issue_session_token, SESSION_COOKIE,
};
use crate::auth::users::create_or_update_from_login;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::server::state::AppState;

/// Query parameters for `GET /api/auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginParams {
    /// Path to return to after login, defaults to `/`
    pub redirect: Option<String>,
}

/// Query parameters the provider sends to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the provider refuses authorization
    pub error: Option<String>,
}

/// Response body for the admin probe
#[derive(Debug, Serialize)]
pub struct IsAdminResponse {
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Start the OAuth login flow
///
/// Generates a random state, remembers it (with the return-to path) in a
/// signed cookie, and redirects the browser to the provider's authorization
/// endpoint.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<LoginParams>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let return_to = sanitize_return_path(params.redirect.as_deref());
    let oauth_state = uuid::Uuid::new_v4().simple().to_string();

    let state_token = issue_state_token(&state.config.auth_secret, &oauth_state, &return_to)?;
    let authorize_url = state.oauth.authorization_url(&oauth_state)?;

    tracing::info!("redirecting browser to the OAuth provider");

    let jar = jar.add(
        Cookie::build((STATE_COOKIE, state_token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    );

    Ok((jar, Redirect::to(&authorize_url)))
}

/// OAuth callback: exchange the code, establish a session
///
/// # Errors
///
/// `401 Unauthorized` when the provider reports an error, when the state
/// cookie is missing/expired, or when the echoed state does not match.
/// Provider failures during the exchange surface as 500.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), ApiError> {
    if let Some(error) = &params.error {
        tracing::warn!(error = %error, "provider refused authorization");
        return Err(ApiError::Unauthorized);
    }

    let code = params.code.as_deref().ok_or(ApiError::Unauthorized)?;
    let echoed_state = params.state.as_deref().ok_or(ApiError::Unauthorized)?;

    let state_cookie = jar.get(STATE_COOKIE).ok_or_else(|| {
        tracing::warn!("OAuth callback without a state cookie");
        ApiError::Unauthorized
    })?;
    let claims = verify_state_token(&state.config.auth_secret, state_cookie.value())
        .map_err(|e| {
            tracing::warn!(error = %e, "state cookie rejected");
            ApiError::Unauthorized
        })?;

    if claims.state != echoed_state {
        tracing::warn!("state mismatch in OAuth callback");
        return Err(ApiError::Unauthorized);
    }

    // Code for token, token for profile
    let token = state.oauth.exchange_code(code).await?;
    let profile = state
        .oauth
        .fetch_userinfo(&token.access_token)
        .await?
        .into_profile()?;

    let initial_role = if profile.admin { "admin" } else { "user" };
    let user = create_or_update_from_login(
        &state.pool,
        &profile.subject,
        &profile.username,
        &profile.name,
        &profile.email,
        initial_role,
    )
    .await?;

    let session = create_session(&state.pool, &user.id).await?;
    let session_token = issue_session_token(&state.config.auth_secret, &session)?;

    tracing::info!(user_id = %user.id, username = %user.username, "user logged in");

    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/")).add(
        Cookie::build((SESSION_COOKIE, session_token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    );

    Ok((jar, Redirect::to(&claims.redirect)))
}

/// Revoke the session and send the browser to the provider's logout page
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    delete_session(&state.pool, &user.session_id).await?;

    tracing::info!(user_id = %user.id, "user logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to(&state.config.oauth_logout_redirect_url)))
}

/// Report whether the caller holds the admin role
pub async fn is_current_user_admin(user: CurrentUser) -> Json<IsAdminResponse> {
    Json(IsAdminResponse {
        is_admin: user.is_admin(),
    })
}

/// Restrict return-to targets to same-origin absolute paths
///
/// Anything else (other origins, scheme-relative `//host` tricks, relative
/// paths) falls back to `/`.
fn sanitize_return_path(redirect: Option<&str>) -> String {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}
