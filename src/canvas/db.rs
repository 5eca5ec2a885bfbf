/**
 * Canvas Database Operations
 *
 * Queries for canvases and their membership rows. Access decisions live in
 * `access.rs`; every query here either joins the caller's membership in so
 * the handler can resolve a role, or assumes the handler already did.
 *
 * Drawing data is stored as a JSON text column and passed through verbatim.
 * The server never parses stored data beyond the object check on write.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Canvas row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CanvasRow {
    /// Canvas ID (UUID, stored as TEXT)
    pub id: String,
    /// Display name
    pub name: String,
    /// Owning user's ID
    pub owner_id: String,
    /// Drawing data as JSON text, None until first saved
    pub data: Option<String>,
    /// Bumped on every data or details write
    pub last_modified_at: DateTime<Utc>,
}

/// Canvas row joined with the caller's membership, if any
///
/// `member_role` is the caller's `canvas_members.role` or None; together with
/// `owner_id` it feeds [`CanvasRole::resolve`](super::access::CanvasRole::resolve).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CanvasAccessRow {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub data: Option<String>,
    pub last_modified_at: DateTime<Utc>,
    /// "collaborator", "viewer", or None
    pub member_role: Option<String>,
}

/// Canvas row for the caller's list view
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CanvasListRow {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub owner_username: String,
    pub last_modified_at: DateTime<Utc>,
    /// The caller's membership role, None when they own the canvas
    pub member_role: Option<String>,
}

/// Membership row joined with the member's username
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRow {
    pub canvas_id: String,
    pub user_id: String,
    /// "collaborator" or "viewer"
    pub role: String,
    pub username: String,
}

/// Canvas row for the management overview
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CanvasAdminRow {
    pub id: String,
    pub name: String,
    pub last_modified_at: DateTime<Utc>,
    pub owner_username: String,
}

/// Fetch one canvas together with the caller's membership
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `canvas_id` - Canvas ID
/// * `user_id` - The caller, joined against `canvas_members`
///
/// # Returns
/// The row, or None when no canvas with that ID exists. A returned row says
/// nothing about access yet; resolve the role before using it.
pub async fn get_canvas_with_access(
    pool: &SqlitePool,
    canvas_id: &str,
    user_id: &str,
) -> Result<Option<CanvasAccessRow>, sqlx::Error> {
    sqlx::query_as::<_, CanvasAccessRow>(
        r#"
        SELECT c.id, c.name, c.owner_id, c.data, c.last_modified_at, m.role AS member_role
        FROM canvases c
        LEFT JOIN canvas_members m ON m.canvas_id = c.id AND m.user_id = ?2
        WHERE c.id = ?1
        "#,
    )
    .bind(canvas_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// List every canvas the caller owns or is a member of
///
/// Sorted by last modification, newest first, with the name as tiebreaker.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - The caller
pub async fn list_visible_canvases(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<CanvasListRow>, sqlx::Error> {
    sqlx::query_as::<_, CanvasListRow>(
        r#"
        SELECT c.id, c.name, c.owner_id, u.username AS owner_username,
               c.last_modified_at, m.role AS member_role
        FROM canvases c
        JOIN users u ON u.id = c.owner_id
        LEFT JOIN canvas_members m ON m.canvas_id = c.id AND m.user_id = ?1
        WHERE c.owner_id = ?1 OR m.user_id IS NOT NULL
        ORDER BY c.last_modified_at DESC, c.name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// List the members of every canvas the given user owns
///
/// One round trip for the whole list view; the handler groups the rows by
/// canvas. Sorted by username so member lists render stably.
pub async fn list_members_of_owned(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Vec<MemberRow>, sqlx::Error> {
    sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT m.canvas_id, m.user_id, m.role, u.username
        FROM canvas_members m
        JOIN canvases c ON c.id = m.canvas_id
        JOIN users u ON u.id = m.user_id
        WHERE c.owner_id = ?1
        ORDER BY u.username ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Create a canvas with no drawing data and no members
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `owner_id` - The creating user, who becomes the owner
/// * `name` - Validated display name
///
/// # Returns
/// The stored row, including the generated ID
pub async fn create_canvas(
    pool: &SqlitePool,
    owner_id: &str,
    name: &str,
) -> Result<CanvasRow, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query_as::<_, CanvasRow>(
        r#"
        INSERT INTO canvases (id, name, owner_id, data, last_modified_at)
        VALUES (?1, ?2, ?3, NULL, ?4)
        RETURNING id, name, owner_id, data, last_modified_at
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(owner_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Overwrite a canvas's drawing data and bump its modification time
///
/// The caller must have resolved write access first.
///
/// # Returns
/// `true` if the canvas existed, `false` if the ID matched nothing
pub async fn update_canvas_data(
    pool: &SqlitePool,
    canvas_id: &str,
    data: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE canvases
        SET data = ?2, last_modified_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(canvas_id)
    .bind(data)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replace a canvas's name and full membership in one transaction
///
/// Membership is replacement, not patch: the previous rows are dropped and
/// the given ID lists written fresh. The caller validates the lists (existing
/// users, no owner, no overlap) before calling.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `canvas_id` - Canvas ID
/// * `name` - Validated display name
/// * `collaborator_ids` - Users to grant write access
/// * `viewer_ids` - Users to grant read access
pub async fn update_canvas_details(
    pool: &SqlitePool,
    canvas_id: &str,
    name: &str,
    collaborator_ids: &[String],
    viewer_ids: &[String],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE canvases
        SET name = ?2, last_modified_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(canvas_id)
    .bind(name)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM canvas_members WHERE canvas_id = ?")
        .bind(canvas_id)
        .execute(&mut *tx)
        .await?;

    for user_id in collaborator_ids {
        sqlx::query(
            "INSERT INTO canvas_members (canvas_id, user_id, role) VALUES (?, ?, 'collaborator')",
        )
        .bind(canvas_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    }

    for user_id in viewer_ids {
        sqlx::query("INSERT INTO canvas_members (canvas_id, user_id, role) VALUES (?, ?, 'viewer')")
            .bind(canvas_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await
}

/// Delete a canvas and, through `ON DELETE CASCADE`, its membership rows
///
/// The caller must have resolved manage access first (or hold the admin
/// role).
///
/// # Returns
/// `true` if a canvas was deleted, `false` if the ID matched nothing
pub async fn delete_canvas(pool: &SqlitePool, canvas_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM canvases WHERE id = ?")
        .bind(canvas_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List every canvas with its owner's username (management view)
pub async fn list_all_canvases(pool: &SqlitePool) -> Result<Vec<CanvasAdminRow>, sqlx::Error> {
    sqlx::query_as::<_, CanvasAdminRow>(
        r#"
        SELECT c.id, c.name, c.last_modified_at, u.username AS owner_username
        FROM canvases c
        JOIN users u ON u.id = c.owner_id
        ORDER BY c.last_modified_at DESC, c.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}
