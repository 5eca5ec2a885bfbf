/**
 * User Endpoint Handlers
 *
 * The one endpoint the share dialog needs: everyone the caller could share
 * a canvas with.
 */

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::auth::users::list_users_except;
use crate::auth::UserRef;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// List every other user as `{id, username}` pairs
///
/// The caller is excluded; sharing a canvas with yourself is meaningless.
pub async fn selection_data(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
) -> Result<Json<Vec<UserRef>>, ApiError> {
    let users = list_users_except(&pool, &user.id).await?;
    Ok(Json(users))
}
