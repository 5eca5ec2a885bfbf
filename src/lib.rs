// Increase recursion limit for deeply nested tower layer stacks
#![recursion_limit = "256"]

//! Canvelot - Collaborative Whiteboard Backend
//!
//! Canvelot is the backend for a collaborative whiteboard application. It
//! stores canvases as opaque JSON drawing documents, authenticates users
//! against an OpenID Connect provider, and enforces a three-role sharing
//! model (owner, collaborator, viewer) per canvas.
//!
//! # Overview
//!
//! This library provides the full HTTP service:
//! - Canvas CRUD with per-canvas sharing
//! - OAuth login with signed-cookie sessions revocable server-side
//! - An admin management API over all users and canvases
//! - Gzip transport for the (potentially large) drawing documents
//! - Static hosting of the frontend with SPA fallback
//!
//! # Module Structure
//!
//! - **`auth`** - OAuth client, user records, sessions, login handlers
//! - **`canvas`** - canvas storage, role resolution, the canvas API
//! - **`user`** - the share dialog's user list
//! - **`management`** - admin-only views and mutations
//! - **`middleware`** - session authentication and the admin gate
//! - **`routes`** - router assembly and the tower middleware stack
//! - **`server`** - startup wiring and shared state
//! - **`config`** - environment-driven configuration
//! - **`error`** - the API error taxonomy
//!
//! # Usage
//!
//! ```rust,no_run
//! use canvelot::config::ServerConfig;
//! use canvelot::server::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Hand `app` to axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Request handlers return [`error::ApiError`], which maps onto the small
//! set of JSON error bodies the frontend understands. Startup paths use
//! their own error enums ([`config::ConfigError`], [`server::InitError`])
//! and fail fast.

/// Authentication: OAuth flow, users, sessions
pub mod auth;

/// Canvas storage, sharing, and endpoints
pub mod canvas;

/// Environment-driven configuration
pub mod config;

/// API error taxonomy
pub mod error;

/// Admin management API
pub mod management;

/// Session and role middleware
pub mod middleware;

/// Router assembly
pub mod routes;

/// Startup wiring and shared state
pub mod server;

/// User-facing user queries
pub mod user;
