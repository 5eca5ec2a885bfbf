//! API Error Module
//!
//! This module defines the error type shared by all HTTP handlers and its
//! conversion into JSON error responses.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`types`** - Error type definition and constructors
//! - **`conversion`** - Error conversion implementations (IntoResponse)
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definition
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Error Taxonomy
//!
//! Every API failure maps onto one of five responses:
//!
//! | status | body |
//! |--------|------|
//! | 400 | `{"error": "Bad Request", "details": "..."}` (details optional) |
//! | 401 | `{"error": "Unauthorized"}` |
//! | 403 | `{"error": "Forbidden"}` |
//! | 404 | `{"error": "Not Found"}` |
//! | 500 | `{"error": "Internal Server Error"}` |
//!
//! Infrastructure failures (database, token signing, provider requests,
//! serialization) convert into the 500 response via `From` impls, so handlers
//! can propagate them with `?`. Their details are logged server-side and never
//! reach the client.

/// Error type definition
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::ApiError;
