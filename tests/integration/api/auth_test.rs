//! Authentication flow integration tests
//!
//! Drives the OAuth dance against the wiremock provider: the login
//! redirect, the callback with state verification, session issuance, the
//! admin probe, and logout revocation.

mod tests {
    use axum::http::header::{COOKIE, LOCATION};
    use axum::http::StatusCode;

    use canvelot::auth::oauth::verify_state_token;

    use crate::common::app::{extract_cookie, TestApp};
    use crate::common::auth_helpers::TEST_AUTH_SECRET;
    use crate::common::mock_oauth::{mount_token_exchange, mount_userinfo};

    /// Complete login for the given profile and return the session cookie
    async fn login_through_provider(app: &TestApp, userinfo: serde_json::Value) -> String {
        app.provider.reset().await;
        mount_token_exchange(&app.provider, "test-code", "test-access-token").await;
        mount_userinfo(&app.provider, userinfo).await;

        let login = app.server.get("/api/auth/login").await;
        let state_cookie = extract_cookie(&login, "canvelot_oauth_state").unwrap();

        let location = login.header(LOCATION);
        let authorize_url = reqwest::Url::parse(location.to_str().unwrap()).unwrap();
        let state = authorize_url
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.to_string())
            .expect("authorization URL carries the state");

        let callback = app
            .server
            .get("/api/auth/callback")
            .add_query_param("code", "test-code")
            .add_query_param("state", &state)
            .add_header(COOKIE, state_cookie.as_str())
            .await;
        assert_eq!(callback.status_code(), StatusCode::SEE_OTHER);

        extract_cookie(&callback, "canvelot_session").expect("callback sets the session cookie")
    }

    #[tokio::test]
    async fn test_login_redirects_to_provider() {
        let app = TestApp::spawn().await;

        let response = app.server.get("/api/auth/login").await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

        let location = response.header(LOCATION);
        let location = location.to_str().unwrap();
        assert!(location.starts_with(&format!("{}/authorize?", app.provider.uri())));
        assert!(location.contains("response_type=code"));
        assert!(location.contains("client_id=canvelot-test"));
        assert!(location.contains("scope=openid+profile+email"));
        assert!(location.contains("state="));

        assert!(extract_cookie(&response, "canvelot_oauth_state").is_some());
    }

    #[tokio::test]
    async fn test_login_keeps_local_return_path() {
        let app = TestApp::spawn().await;

        let response = app
            .server
            .get("/api/auth/login")
            .add_query_param("redirect", "/canvas/9")
            .await;

        let cookie = extract_cookie(&response, "canvelot_oauth_state").unwrap();
        let token = cookie.split_once('=').unwrap().1.to_string();
        let claims = verify_state_token(TEST_AUTH_SECRET, &token).unwrap();
        assert_eq!(claims.redirect, "/canvas/9");
    }

    #[tokio::test]
    async fn test_login_rejects_offsite_return_path() {
        let app = TestApp::spawn().await;

        for evil in ["https://evil.example.com/phish", "//evil.example.com", "relative"] {
            let response = app
                .server
                .get("/api/auth/login")
                .add_query_param("redirect", evil)
                .await;

            let cookie = extract_cookie(&response, "canvelot_oauth_state").unwrap();
            let token = cookie.split_once('=').unwrap().1.to_string();
            let claims = verify_state_token(TEST_AUTH_SECRET, &token).unwrap();
            assert_eq!(claims.redirect, "/", "return path {evil} must be dropped");
        }
    }

    #[tokio::test]
    async fn test_full_login_flow_establishes_session() {
        let app = TestApp::spawn().await;

        mount_token_exchange(&app.provider, "flow-code", "flow-access-token").await;
        mount_userinfo(
            &app.provider,
            serde_json::json!({
                "sub": "subject-42",
                "preferred_username": "wanda",
                "given_name": "Wanda",
                "email": "wanda@example.com",
                "groups": ["Makers"],
            }),
        )
        .await;

        let login = app
            .server
            .get("/api/auth/login")
            .add_query_param("redirect", "/canvas/7")
            .await;
        let state_cookie = extract_cookie(&login, "canvelot_oauth_state").unwrap();
        let location = login.header(LOCATION);
        let authorize_url = reqwest::Url::parse(location.to_str().unwrap()).unwrap();
        let state = authorize_url
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.to_string())
            .unwrap();

        let callback = app
            .server
            .get("/api/auth/callback")
            .add_query_param("code", "flow-code")
            .add_query_param("state", &state)
            .add_header(COOKIE, state_cookie.as_str())
            .await;

        assert_eq!(callback.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(callback.header(LOCATION).to_str().unwrap(), "/canvas/7");

        let session = extract_cookie(&callback, "canvelot_session").unwrap();

        let probe = app
            .server
            .get("/api/authentication/is-current-user-admin")
            .add_header(COOKIE, session.as_str())
            .await;
        assert_eq!(probe.status_code(), StatusCode::OK);
        let body: serde_json::Value = probe.json();
        assert_eq!(body, serde_json::json!({ "isAdmin": false }));

        let row: (String, String) =
            sqlx::query_as("SELECT username, role FROM users WHERE oauth_subject = 'subject-42'")
                .fetch_one(&app.pool)
                .await
                .unwrap();
        assert_eq!(row.0, "wanda");
        assert_eq!(row.1, "user");
    }

    #[tokio::test]
    async fn test_admin_group_grants_admin_on_first_login() {
        let app = TestApp::spawn().await;

        let session = login_through_provider(
            &app,
            serde_json::json!({
                "sub": "subject-boss",
                "preferred_username": "boss",
                "given_name": "Boss",
                "email": "boss@example.com",
                "groups": ["Canvelot Admin Team"],
            }),
        )
        .await;

        let probe = app
            .server
            .get("/api/authentication/is-current-user-admin")
            .add_header(COOKIE, session.as_str())
            .await;
        let body: serde_json::Value = probe.json();
        assert_eq!(body, serde_json::json!({ "isAdmin": true }));
    }

    #[tokio::test]
    async fn test_later_logins_update_profile_but_not_role() {
        let app = TestApp::spawn().await;

        login_through_provider(
            &app,
            serde_json::json!({
                "sub": "subject-switch",
                "preferred_username": "early",
                "given_name": "Early",
                "email": "early@example.com",
                "groups": ["Admin"],
            }),
        )
        .await;

        // Same subject logs in again, renamed and stripped of the group
        login_through_provider(
            &app,
            serde_json::json!({
                "sub": "subject-switch",
                "preferred_username": "late",
                "given_name": "Late",
                "email": "late@example.com",
                "groups": [],
            }),
        )
        .await;

        let row: (String, String) =
            sqlx::query_as("SELECT username, role FROM users WHERE oauth_subject = 'subject-switch'")
                .fetch_one(&app.pool)
                .await
                .unwrap();
        assert_eq!(row.0, "late", "profile fields follow the provider");
        assert_eq!(row.1, "admin", "the stored role survives later logins");

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&app.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1, "logins upsert by subject, never duplicate");
    }

    #[tokio::test]
    async fn test_callback_rejects_state_mismatch() {
        let app = TestApp::spawn().await;

        let login = app.server.get("/api/auth/login").await;
        let state_cookie = extract_cookie(&login, "canvelot_oauth_state").unwrap();

        let callback = app
            .server
            .get("/api/auth/callback")
            .add_query_param("code", "some-code")
            .add_query_param("state", "forged-state")
            .add_header(COOKIE, state_cookie.as_str())
            .await;

        assert_eq!(callback.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_callback_without_state_cookie_is_unauthorized() {
        let app = TestApp::spawn().await;

        let callback = app
            .server
            .get("/api/auth/callback")
            .add_query_param("code", "some-code")
            .add_query_param("state", "some-state")
            .await;

        assert_eq!(callback.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_callback_with_provider_error_is_unauthorized() {
        let app = TestApp::spawn().await;

        let callback = app
            .server
            .get("/api/auth/callback")
            .add_query_param("error", "access_denied")
            .await;

        assert_eq!(callback.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_revokes_the_session() {
        let app = TestApp::spawn().await;
        let (_user, cookie) = app.login_as("lola", "user").await;

        let response = app
            .server
            .get("/api/authentication/logout")
            .add_header(COOKIE, cookie.as_str())
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.header(LOCATION).to_str().unwrap(),
            app.config.oauth_logout_redirect_url
        );

        let cleared = extract_cookie(&response, "canvelot_session").unwrap();
        assert_eq!(cleared, "canvelot_session=", "cookie must be cleared");

        // The signed cookie is still cryptographically valid, but its
        // session row is gone
        let after = app
            .server
            .get("/api/canvas")
            .add_header(COOKIE, cookie.as_str())
            .await;
        assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_probe_without_session_is_unauthorized() {
        let app = TestApp::spawn().await;

        let response = app
            .server
            .get("/api/authentication/is-current-user-admin")
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body, serde_json::json!({ "error": "Unauthorized" }));
    }
}
