//! User API integration tests
//!
//! The share dialog source: every user except the caller.

mod tests {
    use axum::http::header::COOKIE;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::common::app::TestApp;

    #[tokio::test]
    async fn test_selection_data_requires_a_session() {
        let app = TestApp::spawn().await;

        let response = app.server.get("/api/user/selection-data").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn test_selection_data_lists_everyone_but_the_caller() {
        let app = TestApp::spawn().await;
        let (alice, alice_cookie) = app.login_as("alice", "user").await;
        let (bob, bob_cookie) = app.login_as("bob", "user").await;
        let (carol, _) = app.login_as("carol", "admin").await;

        let response = app
            .server
            .get("/api/user/selection-data")
            .add_header(COOKIE, alice_cookie.as_str())
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(
            body,
            json!([
                { "id": bob.id, "username": "bob" },
                { "id": carol.id, "username": "carol" },
            ])
        );

        // Each caller is filtered out of their own list
        let response = app
            .server
            .get("/api/user/selection-data")
            .add_header(COOKIE, bob_cookie.as_str())
            .await;
        let body: Value = response.json();
        assert_eq!(
            body,
            json!([
                { "id": alice.id, "username": "alice" },
                { "id": carol.id, "username": "carol" },
            ])
        );
    }
}
