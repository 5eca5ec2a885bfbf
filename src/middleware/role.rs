/**
 * Admin Role Middleware
 *
 * Gate for the management API. Runs behind the session middleware, so a
 * `CurrentUser` is normally present; a missing one means the route was
 * wired outside the session layer and is treated as unauthorized.
 */

use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;

/// Reject non-admin callers with 403
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(ApiError::Unauthorized)?;

    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, "management access denied");
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
