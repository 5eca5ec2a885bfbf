//! Mock OAuth provider
//!
//! A wiremock server standing in for the identity provider: discovery
//! document, token endpoint, and userinfo endpoint. Discovery is mounted
//! up front (the application fetches it at startup); the token and
//! userinfo mocks are mounted per test with the profile under test.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a provider serving its discovery document
pub async fn start_provider() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "issuer": server.uri(),
            "authorization_endpoint": format!("{}/authorize", server.uri()),
            "token_endpoint": format!("{}/token", server.uri()),
            "userinfo_endpoint": format!("{}/userinfo", server.uri()),
        })))
        .mount(&server)
        .await;

    server
}

/// Accept the code-for-token exchange, answering with `access_token`
///
/// The matcher insists the request is a form POST carrying the expected
/// authorization code.
pub async fn mount_token_exchange(server: &MockServer, code: &str, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(format!("code={code}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

/// Serve a userinfo profile
pub async fn mount_userinfo(server: &MockServer, userinfo: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(userinfo))
        .mount(server)
        .await;
}
