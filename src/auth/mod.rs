//! Authentication Module
//!
//! This module handles OAuth login, session management, and user records.
//! The server never sees a password: authentication is delegated to an
//! external OAuth2/OIDC provider, and this module is the thin integration
//! around it.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`oauth`** - provider discovery, code exchange, userinfo, profile mapping
//! - **`sessions`** - session rows and the signed session cookie
//! - **`users`** - user records: upsert on login, queries, role changes
//! - **`handlers`** - HTTP handlers for login, callback, logout, admin probe
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs        - Module exports and documentation
//! ├── oauth.rs      - OAuth provider client
//! ├── sessions.rs   - Sessions and session tokens
//! ├── users.rs      - User model and database operations
//! └── handlers.rs   - HTTP handlers
//! ```
//!
//! # Login Flow
//!
//! 1. **Login**: random state into a signed cookie, redirect to the provider
//! 2. **Callback**: state check, code exchange, userinfo fetch, user upsert,
//!    session row + session cookie, redirect back to the app
//! 3. **Logout**: session row deleted, cookie cleared, redirect to the
//!    provider's logout page
//!
//! # Security
//!
//! - Session and state cookies are HttpOnly and SameSite=Lax
//! - Session tokens are HS256 JWTs naming a revocable database row
//! - Roles come from the provider's groups only on first login; afterwards
//!   the role stored in the database wins

/// OAuth provider client and profile mapping
pub mod oauth;

/// Session rows and session tokens
pub mod sessions;

/// User model and database operations
pub mod users;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::{callback, is_current_user_admin, login, logout};
pub use users::{User, UserRef};
