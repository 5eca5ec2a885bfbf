/**
 * Session Management and Session Tokens
 *
 * Sessions are rows in the `sessions` table; the browser holds a signed
 * token (JWT, HS256) in the `canvelot_session` cookie that names the row.
 * Splitting the two keeps logout and admin-side user deletion effective
 * immediately: deleting the row revokes the session no matter what cookies
 * are still out there, and role changes are picked up on the next request
 * because the user record is re-read every time.
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::users::{get_user_by_id, User};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "canvelot_session";

/// Session lifetime
const SESSION_TTL_DAYS: i64 = 7;

/// Session row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Opaque session ID (UUID)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Hard expiry; the row is deleted when seen past this point
    pub expires_at: DateTime<Utc>,
}

/// Claims carried by the session cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Session row ID
    pub sid: String,
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp), mirrors the row's `expires_at`
    pub exp: u64,
}

/// Create a session row for a user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - The user logging in
pub async fn create_session(pool: &SqlitePool, user_id: &str) -> Result<Session, sqlx::Error> {
    let now = Utc::now();
    let session = Session {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        created_at: now,
        expires_at: now + Duration::days(SESSION_TTL_DAYS),
    };

    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(session.created_at)
    .bind(session.expires_at)
    .execute(pool)
    .await?;

    Ok(session)
}

/// Sign a session cookie token for a session row
///
/// # Arguments
/// * `secret` - HMAC secret (`AUTH_SECRET`)
/// * `session` - The session row to reference
///
/// # Returns
/// Encoded JWT string
pub fn issue_session_token(
    secret: &str,
    session: &Session,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = SessionClaims {
        sid: session.id.clone(),
        sub: session.user_id.clone(),
        exp: session.expires_at.timestamp().max(0) as u64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

/// Verify and decode a session cookie token
///
/// Signature and `exp` are checked here; whether the named session row
/// still exists is checked separately by [`load_session_user`].
pub fn verify_session_token(
    secret: &str,
    token: &str,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Load the user behind a session row
///
/// Returns `None` when the row is gone (logout, user deletion) or expired.
/// Expired rows are deleted on sight.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `session_id` - The `sid` claim from a verified token
pub async fn load_session_user(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT id, user_id, created_at, expires_at
        FROM sessions
        WHERE id = ?
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    let Some(session) = session else {
        return Ok(None);
    };

    if session.expires_at <= Utc::now() {
        delete_session(pool, &session.id).await?;
        return Ok(None);
    }

    get_user_by_id(pool, &session.user_id).await
}

/// Delete a session row, revoking the session
pub async fn delete_session(pool: &SqlitePool, session_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(())
}
