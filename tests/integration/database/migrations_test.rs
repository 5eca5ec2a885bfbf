//! Migration and cascade tests

mod tests {
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use canvelot::auth::sessions::{create_session, load_session_user};
    use canvelot::auth::users::{create_or_update_from_login, delete_user, get_user_by_id};
    use canvelot::canvas::db::delete_canvas;

    use crate::common::auth_helpers::create_test_user;
    use crate::common::database::{count_rows, create_test_pool, seed_canvas, seed_member};

    #[tokio::test]
    async fn test_migrations_create_the_schema() {
        let pool = create_test_pool().await;

        for table in ["users", "canvases", "canvas_members", "sessions"] {
            let row: (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(row.0, 1, "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_login_upsert_keeps_the_stored_role() {
        let pool = create_test_pool().await;

        let first = create_or_update_from_login(
            &pool,
            "subject-1",
            "early",
            "Early Bird",
            "early@example.com",
            "admin",
        )
        .await
        .unwrap();

        let second = create_or_update_from_login(
            &pool,
            "subject-1",
            "late",
            "Late Riser",
            "late@example.com",
            "user",
        )
        .await
        .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.username, "late");
        assert_eq!(second.email, "late@example.com");
        assert_eq!(second.role, "admin", "a later login never demotes");
        assert_eq!(count_rows(&pool, "users").await, 1);
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let pool = create_test_pool().await;

        create_or_update_from_login(&pool, "subject-1", "dup", "One", "one@example.com", "user")
            .await
            .unwrap();

        let clash = create_or_update_from_login(
            &pool,
            "subject-2",
            "dup",
            "Two",
            "two@example.com",
            "user",
        )
        .await;

        assert!(clash.is_err(), "two subjects cannot share a username");
    }

    #[tokio::test]
    async fn test_deleting_a_user_cascades() {
        let pool = create_test_pool().await;
        let alice = create_test_user(&pool, "alice", "user").await;
        let bob = create_test_user(&pool, "bob", "user").await;

        let canvas = seed_canvas(&pool, &alice.id, "Board").await;
        seed_member(&pool, &canvas.id, &bob.id, "collaborator").await;
        create_session(&pool, &alice.id).await.unwrap();

        assert!(delete_user(&pool, &alice.id).await.unwrap());

        assert_eq!(count_rows(&pool, "canvases").await, 0);
        assert_eq!(count_rows(&pool, "canvas_members").await, 0);
        assert_eq!(count_rows(&pool, "sessions").await, 0);
        assert!(get_user_by_id(&pool, &bob.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_deleting_a_canvas_cascades_membership() {
        let pool = create_test_pool().await;
        let alice = create_test_user(&pool, "alice", "user").await;
        let bob = create_test_user(&pool, "bob", "user").await;
        let carol = create_test_user(&pool, "carol", "user").await;

        let canvas = seed_canvas(&pool, &alice.id, "Board").await;
        seed_member(&pool, &canvas.id, &bob.id, "collaborator").await;
        seed_member(&pool, &canvas.id, &carol.id, "viewer").await;

        assert!(delete_canvas(&pool, &canvas.id).await.unwrap());

        assert_eq!(count_rows(&pool, "canvases").await, 0);
        assert_eq!(count_rows(&pool, "canvas_members").await, 0);
        assert_eq!(count_rows(&pool, "users").await, 3, "members survive");
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped_on_load() {
        let pool = create_test_pool().await;
        let alice = create_test_user(&pool, "alice", "user").await;
        let session = create_session(&pool, &alice.id).await.unwrap();

        sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
            .bind(Utc::now() - Duration::days(1))
            .bind(&session.id)
            .execute(&pool)
            .await
            .unwrap();

        let user = load_session_user(&pool, &session.id).await.unwrap();
        assert!(user.is_none());
        assert_eq!(count_rows(&pool, "sessions").await, 0, "deleted on sight");
    }
}
