/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines all
 * route groups and the middleware stack into a single Axum router.
 *
 * # Route Groups
 *
 * 1. `/api/auth` - OAuth login and callback, reachable without a session
 * 2. `/api/canvas` - canvas CRUD and sharing
 * 3. `/api/user` - share dialog user list
 * 4. `/api/authentication` - session probes and logout
 * 5. `/api/management` - admin API, gated by the role middleware
 * 6. Fallback - static frontend files, unknown paths serve `index.html`
 *
 * # Middleware Order
 *
 * Outermost first on the way in: trace, CORS, response compression,
 * request decompression, body limit, session. The body limit sits inside
 * the decompression layer so it bounds the inflated size of gzipped
 * uploads, and the session middleware is applied in a separate `layer`
 * call so it stays innermost and every protected route group sees the
 * authenticated user extension.
 */

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    decompression::RequestDecompressionLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::auth;
use crate::canvas;
use crate::config::ServerConfig;
use crate::management;
use crate::middleware::{auth::require_session, role::require_admin};
use crate::server::state::AppState;
use crate::user;

/// Largest accepted request body, canvas documents included
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Create the Axum router with all routes and middleware configured
///
/// # Arguments
///
/// * `state` - Application state (pool, config, OAuth client)
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(state: AppState) -> Router<()> {
    let auth_routes = Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback));

    let authentication_routes = Router::new()
        .route("/is-current-user-admin", get(auth::is_current_user_admin))
        .route("/logout", get(auth::logout));

    let canvas_routes = Router::new()
        .route("/", get(canvas::list_canvases).post(canvas::create_canvas))
        .route("/data/{id}", put(canvas::update_canvas_data))
        .route("/details/{id}", put(canvas::update_canvas_details))
        .route(
            "/{id}",
            get(canvas::get_canvas_data).delete(canvas::delete_canvas),
        );

    let user_routes = Router::new().route("/selection-data", get(user::selection_data));

    let management_routes = Router::new()
        .route("/users", get(management::list_all_users))
        .route("/users/{id}", delete(management::remove_user))
        .route("/users/{id}/role", put(management::update_user_role))
        .route("/canvas", get(management::list_canvases_admin))
        .route("/canvas/{id}", delete(management::remove_canvas))
        .layer(middleware::from_fn(require_admin));

    // Unknown paths fall through to index.html, served as 200, so frontend
    // routing works on hard reloads
    let index_file = state.config.static_dir.join("index.html");
    let static_files =
        ServeDir::new(&state.config.static_dir).fallback(ServeFile::new(index_file));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/canvas", canvas_routes)
        .nest("/api/user", user_routes)
        .nest("/api/authentication", authentication_routes)
        .nest("/api/management", management_routes)
        .fallback_service(static_files)
        // `from_fn` only accepts a plain request body, so the session layer
        // gets its own call beneath the body-transforming stack; later
        // `layer` calls wrap earlier ones, keeping it innermost
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config))
                .layer(CompressionLayer::new())
                .layer(RequestDecompressionLayer::new())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

/// Build the CORS layer from the configured origins
///
/// Credentials are allowed, so origins must be listed explicitly; a
/// wildcard would be rejected by browsers (and by tower-http) in
/// combination with cookies.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
}
