/**
 * Management Endpoint Handlers
 *
 * Admin-only views and mutations over every user and canvas:
 *
 * - `GET /api/management/users` - list all users
 * - `DELETE /api/management/users/{id}` - delete a user
 * - `PUT /api/management/users/{id}/role` - change a user's role
 * - `GET /api/management/canvas` - list all canvases
 * - `DELETE /api/management/canvas/{id}` - delete any canvas
 *
 * The admin gate itself lives in the role middleware; by the time a request
 * reaches these handlers the caller is a known admin. Deleting a user also
 * drops their sessions, their canvases, and their memberships. An admin may
 * delete or demote themselves; the change takes effect on their next
 * request.
 */

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::users::{delete_user, list_users, set_user_role};
use crate::canvas::db::{delete_canvas, list_all_canvases};
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// One user in the management list
#[derive(Debug, Serialize)]
pub struct ManagedUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: String,
}

/// One canvas in the management list
///
/// `owner` is the owner's username, not a user object; the management view
/// has no use for the ID.
#[derive(Debug, Serialize)]
pub struct ManagedCanvas {
    pub id: String,
    pub name: String,
    #[serde(rename = "lastModifiedAt")]
    pub last_modified_at: DateTime<Utc>,
    pub owner: String,
}

/// Body of `PUT /api/management/users/{id}/role`
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Acknowledgement with a human-readable message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// List every user
pub async fn list_all_users(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<ManagedUser>>, ApiError> {
    let users = list_users(&pool).await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| ManagedUser {
                id: user.id,
                name: user.name,
                username: user.username,
                role: user.role,
            })
            .collect(),
    ))
}

/// Delete a user and everything hanging off them
pub async fn remove_user(
    State(pool): State<SqlitePool>,
    admin: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    parse_id(&id)?;

    if !delete_user(&pool, &id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(user_id = %id, admin_id = %admin.id, "user deleted by admin");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Change a user's role
pub async fn update_user_role(
    State(pool): State<SqlitePool>,
    admin: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    parse_id(&id)?;
    let Json(request) = body.map_err(|_| ApiError::bad_request())?;

    if request.role != "admin" && request.role != "user" {
        return Err(ApiError::bad_request_with("role must be admin or user"));
    }

    if !set_user_role(&pool, &id, &request.role).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(user_id = %id, role = %request.role, admin_id = %admin.id, "user role updated");

    Ok(Json(MessageResponse::new("User role updated successfully")))
}

/// List every canvas with its owner's username
pub async fn list_canvases_admin(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<ManagedCanvas>>, ApiError> {
    let canvases = list_all_canvases(&pool).await?;

    Ok(Json(
        canvases
            .into_iter()
            .map(|canvas| ManagedCanvas {
                id: canvas.id,
                name: canvas.name,
                last_modified_at: canvas.last_modified_at,
                owner: canvas.owner_username,
            })
            .collect(),
    ))
}

/// Delete any canvas, ownership notwithstanding
pub async fn remove_canvas(
    State(pool): State<SqlitePool>,
    admin: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    parse_id(&id)?;

    if !delete_canvas(&pool, &id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(canvas_id = %id, admin_id = %admin.id, "canvas deleted by admin");

    Ok(Json(MessageResponse::new("Canvas deleted successfully")))
}

/// Reject path IDs that are not well-formed UUIDs
fn parse_id(id: &str) -> Result<(), ApiError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ApiError::bad_request())
}
