/**
 * User Model and Database Operations
 *
 * This module handles user records and their database operations. Users are
 * created on their first OAuth login and updated on every subsequent login;
 * there is no local signup path.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// User record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID, stored as TEXT)
    pub id: String,
    /// Subject claim from the OAuth provider, the stable identity link
    pub oauth_subject: String,
    /// Username from the provider profile
    pub username: String,
    /// Display name from the provider profile
    pub name: String,
    /// Email address from the provider profile
    pub email: String,
    /// Application role: "admin" or "user"
    pub role: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this user may access the management API
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Slim user reference used in share dialogs and membership lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRef {
    /// User ID
    pub id: String,
    /// Username
    pub username: String,
}

/// Create a user on first login, or refresh profile fields on a later one
///
/// Matching is by `oauth_subject`. Username, display name, and email are
/// refreshed from the provider profile on every login. The role is written
/// only on first creation, so roles assigned through the management API are
/// never clobbered by a login.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `oauth_subject` - Provider subject claim
/// * `username` - Username from the provider profile
/// * `name` - Display name from the provider profile
/// * `email` - Email from the provider profile
/// * `initial_role` - Role if the user does not exist yet ("admin" or "user")
///
/// # Returns
/// The stored user, with whatever role the database holds
pub async fn create_or_update_from_login(
    pool: &SqlitePool,
    oauth_subject: &str,
    username: &str,
    name: &str,
    email: &str,
    initial_role: &str,
) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, oauth_subject, username, name, email, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(oauth_subject) DO UPDATE SET
            username = excluded.username,
            name = excluded.name,
            email = excluded.email,
            updated_at = excluded.updated_at
        RETURNING id, oauth_subject, username, name, email, role, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(oauth_subject)
    .bind(username)
    .bind(name)
    .bind(email)
    .bind(initial_role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - User ID
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, oauth_subject, username, name, email, role, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// List every user (management view)
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, oauth_subject, username, name, email, role, created_at, updated_at
        FROM users
        ORDER BY username ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// List every user except the given one (share dialog data)
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - The caller, excluded from the result
pub async fn list_users_except(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<UserRef>, sqlx::Error> {
    sqlx::query_as::<_, UserRef>(
        r#"
        SELECT id, username
        FROM users
        WHERE id != ?
        ORDER BY username ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Delete a user
///
/// Sessions, canvas memberships, and owned canvases go with them through
/// `ON DELETE CASCADE`.
///
/// # Returns
/// `true` if a user was deleted, `false` if the ID matched nothing
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Set a user's role
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - User ID
/// * `role` - "admin" or "user" (validated by the caller)
///
/// # Returns
/// `true` if a user was updated, `false` if the ID matched nothing
pub async fn set_user_role(pool: &SqlitePool, id: &str, role: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count how many of the given IDs exist as users
///
/// Used to validate membership updates before writing them.
pub async fn count_existing(pool: &SqlitePool, ids: &[String]) -> Result<i64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut builder = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM users WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let count: (i64,) = builder.build_query_as().fetch_one(pool).await?;
    Ok(count.0)
}
