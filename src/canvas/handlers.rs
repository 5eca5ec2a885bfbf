/**
 * Canvas Endpoint Handlers
 *
 * HTTP handlers for the canvas API:
 *
 * - `GET /api/canvas` - list canvases visible to the caller
 * - `POST /api/canvas` - create a canvas
 * - `GET /api/canvas/{id}` - fetch the drawing data
 * - `PUT /api/canvas/data/{id}` - overwrite the drawing data
 * - `PUT /api/canvas/details/{id}` - rename and reshare
 * - `DELETE /api/canvas/{id}` - delete a canvas
 *
 * Role errors follow one rule: a caller with no relationship to a canvas
 * gets 404 and never learns it exists, a caller whose role is too weak for
 * the operation gets 403.
 */

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::users::count_existing;
use crate::auth::UserRef;
use crate::canvas::access::CanvasRole;
use crate::canvas::db::{self, CanvasAccessRow, CanvasListRow, MemberRow};
use crate::canvas::types::{
    CanvasSummary, CreateCanvasRequest, CreateCanvasResponse, SuccessResponse,
    UpdateCanvasDetailsRequest,
};
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// List every canvas the caller owns or was shared
pub async fn list_canvases(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
) -> Result<Json<Vec<CanvasSummary>>, ApiError> {
    let rows = db::list_visible_canvases(&pool, &user.id).await?;
    let members = db::list_members_of_owned(&pool, &user.id).await?;

    Ok(Json(build_canvas_list(rows, members, &user.id)))
}

/// Create an empty canvas owned by the caller
pub async fn create_canvas(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    body: Result<Json<CreateCanvasRequest>, JsonRejection>,
) -> Result<Json<CreateCanvasResponse>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::bad_request())?;
    let name = request.validate()?;

    let canvas = db::create_canvas(&pool, &user.id, &name).await?;
    tracing::info!(canvas_id = %canvas.id, user_id = %user.id, "canvas created");

    Ok(Json(CreateCanvasResponse { id: canvas.id }))
}

/// Fetch a canvas's drawing data as stored
///
/// The body is the JSON document the last writer saved, or `null` when the
/// canvas has never been saved. Any role may read.
pub async fn get_canvas_data(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    parse_canvas_id(&id)?;

    let canvas = db::get_canvas_with_access(&pool, &id, &user.id)
        .await?
        .ok_or(ApiError::NotFound)?;
    resolve_role(&canvas, &user.id)?;

    let body = canvas.data.unwrap_or_else(|| "null".to_string());
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Overwrite a canvas's drawing data
///
/// Owners and collaborators only. The body must be a JSON object; it is
/// stored verbatim, the server does not inspect the drawing structure.
pub async fn update_canvas_data(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    parse_canvas_id(&id)?;
    let Json(data) = body.map_err(|_| ApiError::bad_request())?;

    let canvas = db::get_canvas_with_access(&pool, &id, &user.id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let role = resolve_role(&canvas, &user.id)?;
    if !role.can_write_data() {
        return Err(ApiError::Forbidden);
    }

    if !data.is_object() {
        return Err(ApiError::bad_request_with(
            "canvas data must be a JSON object",
        ));
    }

    let serialized = serde_json::to_string(&data)?;
    if !db::update_canvas_data(&pool, &id, &serialized).await? {
        return Err(ApiError::NotFound);
    }

    tracing::debug!(canvas_id = %id, user_id = %user.id, bytes = serialized.len(), "canvas data saved");

    Ok(Json(SuccessResponse::ok()))
}

/// Rename a canvas and replace its membership
///
/// Owner only. Both member sets are replaced wholesale with the given ID
/// lists; see [`UpdateCanvasDetailsRequest::validate`] for the checks a
/// request must pass.
pub async fn update_canvas_details(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateCanvasDetailsRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    parse_canvas_id(&id)?;
    let Json(request) = body.map_err(|_| ApiError::bad_request())?;

    let canvas = db::get_canvas_with_access(&pool, &id, &user.id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let role = resolve_role(&canvas, &user.id)?;
    if !role.can_manage() {
        return Err(ApiError::Forbidden);
    }

    let update = request.validate(&user.id)?;

    let mut member_ids = update.collaborator_ids.clone();
    member_ids.extend(update.viewer_ids.iter().cloned());
    if count_existing(&pool, &member_ids).await? != member_ids.len() as i64 {
        return Err(ApiError::bad_request_with("unknown user id"));
    }

    db::update_canvas_details(
        &pool,
        &id,
        &update.name,
        &update.collaborator_ids,
        &update.viewer_ids,
    )
    .await?;

    tracing::info!(
        canvas_id = %id,
        user_id = %user.id,
        collaborators = update.collaborator_ids.len(),
        viewers = update.viewer_ids.len(),
        "canvas details updated"
    );

    Ok(Json(SuccessResponse::ok()))
}

/// Delete a canvas
///
/// Owner only. Membership rows go with it.
pub async fn delete_canvas(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    parse_canvas_id(&id)?;

    let canvas = db::get_canvas_with_access(&pool, &id, &user.id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let role = resolve_role(&canvas, &user.id)?;
    if !role.can_manage() {
        return Err(ApiError::Forbidden);
    }

    if !db::delete_canvas(&pool, &id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(canvas_id = %id, user_id = %user.id, "canvas deleted");

    Ok(Json(SuccessResponse::ok()))
}

/// Reject IDs that are not well-formed UUIDs before touching the database
fn parse_canvas_id(id: &str) -> Result<(), ApiError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ApiError::bad_request())
}

/// Resolve the caller's role or hide the canvas behind 404
fn resolve_role(canvas: &CanvasAccessRow, user_id: &str) -> Result<CanvasRole, ApiError> {
    CanvasRole::resolve(&canvas.owner_id, canvas.member_role.as_deref(), user_id)
        .ok_or(ApiError::NotFound)
}

/// Assemble the list response from the canvas rows and the member rows of
/// the caller's own canvases
fn build_canvas_list(
    rows: Vec<CanvasListRow>,
    members: Vec<MemberRow>,
    user_id: &str,
) -> Vec<CanvasSummary> {
    let mut members_by_canvas: HashMap<String, (Vec<UserRef>, Vec<UserRef>)> = HashMap::new();
    for member in members {
        let entry = members_by_canvas.entry(member.canvas_id).or_default();
        let user = UserRef {
            id: member.user_id,
            username: member.username,
        };
        match member.role.as_str() {
            "collaborator" => entry.0.push(user),
            _ => entry.1.push(user),
        }
    }

    rows.into_iter()
        .map(|row| {
            let is_owner = row.owner_id == user_id;
            let owner = UserRef {
                id: row.owner_id,
                username: row.owner_username,
            };

            if is_owner {
                let (collaborators, viewers) =
                    members_by_canvas.remove(&row.id).unwrap_or_default();
                CanvasSummary {
                    id: row.id,
                    name: row.name,
                    owner,
                    is_owner: true,
                    editable: true,
                    last_modified_at: row.last_modified_at,
                    collaborators: Some(collaborators),
                    viewers: Some(viewers),
                }
            } else {
                let editable = row.member_role.as_deref() == Some("collaborator");
                CanvasSummary {
                    id: row.id,
                    name: row.name,
                    owner,
                    is_owner: false,
                    editable,
                    last_modified_at: row.last_modified_at,
                    collaborators: None,
                    viewers: None,
                }
            }
        })
        .collect()
}
