//! Middleware Module
//!
//! Request-processing middleware:
//!
//! - **`auth`** - session verification, `CurrentUser` extraction, login redirects
//! - **`role`** - admin gate for the management API

/// Session verification and current-user extraction
pub mod auth;

/// Admin role gate
pub mod role;

// Re-export commonly used types
pub use auth::CurrentUser;
