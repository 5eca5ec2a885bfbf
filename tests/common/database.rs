//! Database test fixtures and utilities
//!
//! Provides an in-memory database with the real migrations applied, plus
//! seed helpers for canvases and memberships.

use canvelot::canvas::db::{create_canvas, CanvasRow};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Create an in-memory test database with the schema applied
///
/// The pool is capped at one connection: every new connection to
/// `sqlite::memory:` opens its own empty database, so a larger pool would
/// scatter the test data.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Seed a canvas owned by the given user
pub async fn seed_canvas(pool: &SqlitePool, owner_id: &str, name: &str) -> CanvasRow {
    create_canvas(pool, owner_id, name)
        .await
        .expect("Failed to seed canvas")
}

/// Seed a membership row ("collaborator" or "viewer")
pub async fn seed_member(pool: &SqlitePool, canvas_id: &str, user_id: &str, role: &str) {
    sqlx::query("INSERT INTO canvas_members (canvas_id, user_id, role) VALUES (?, ?, ?)")
        .bind(canvas_id)
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await
        .expect("Failed to seed canvas member");
}

/// Count rows in a table, for cascade assertions
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows");
    row.0
}
