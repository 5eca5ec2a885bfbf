/**
 * Session Middleware
 *
 * This middleware guards every route except the OAuth flow itself. It
 * verifies the session cookie, loads the session row and its user from the
 * database, and attaches a `CurrentUser` to the request extensions.
 *
 * Requests without a usable session are handled by kind:
 * - API requests get `401 Unauthorized`
 * - Page GETs are redirected into the login flow, returning to the
 *   original path afterwards
 * - Asset GETs (`/assets/`, `/favicon*`, `/robots.txt`) pass through so the
 *   login page itself can load
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::auth::sessions::{load_session_user, verify_session_token, SESSION_COOKIE};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Authenticated caller, attached to request extensions by the middleware
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// User ID
    pub id: String,
    /// Username
    pub username: String,
    /// Application role: "admin" or "user"
    pub role: String,
    /// Session row behind this request, needed for logout
    pub session_id: String,
}

impl CurrentUser {
    /// Whether this caller may access the management API
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Session verification middleware
///
/// 1. Lets the OAuth flow (`/api/auth/…`) and asset GETs through untouched
/// 2. Verifies the session cookie and loads the session's user
/// 3. Attaches [`CurrentUser`] to request extensions
/// 4. Without a session: 401 for API routes, login redirect for page GETs
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();

    // The login/callback endpoints must work without a session
    if path.starts_with("/api/auth/") {
        return Ok(next.run(request).await);
    }

    if request.method() == Method::GET && is_asset(&path) {
        return Ok(next.run(request).await);
    }

    if let Some(user) = session_user(&state, &jar).await? {
        request.extensions_mut().insert(user);
        return Ok(next.run(request).await);
    }

    if path.starts_with("/api/") {
        return Err(ApiError::Unauthorized);
    }

    // An unauthenticated page load goes straight into the login flow and
    // comes back to the page it wanted
    if request.method() == Method::GET {
        let original = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let login_url = login_redirect_url(&state.config, &original)?;
        return Ok(Redirect::to(&login_url).into_response());
    }

    Err(ApiError::Unauthorized)
}

/// Resolve the session cookie to a user, treating any defect as "no session"
async fn session_user(state: &AppState, jar: &CookieJar) -> Result<Option<CurrentUser>, ApiError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let claims = match verify_session_token(&state.config.auth_secret, cookie.value()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "session token rejected");
            return Ok(None);
        }
    };

    // Database failures are real errors; a missing row just means the
    // session was revoked
    let Some(user) = load_session_user(&state.pool, &claims.sid).await? else {
        return Ok(None);
    };

    Ok(Some(CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
        session_id: claims.sid,
    }))
}

/// Build the absolute login URL with the original path as return target
fn login_redirect_url(config: &ServerConfig, original: &str) -> Result<String, ApiError> {
    reqwest::Url::parse_with_params(
        &format!("{}/api/auth/login", config.base_url),
        &[("redirect", original)],
    )
    .map(String::from)
    .map_err(|e| ApiError::internal(format!("failed to build login redirect: {e}")))
}

/// Paths served without a session so the browser can render anything at all
fn is_asset(path: &str) -> bool {
    path.starts_with("/assets/") || path.starts_with("/favicon") || path.starts_with("/robots.txt")
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            tracing::warn!("CurrentUser not found in request extensions");
            ApiError::Unauthorized
        })
    }
}
