//! User-facing user queries
//!
//! Holds the share dialog's user list. User records themselves live in
//! [`crate::auth::users`]; this module only exposes what a signed-in,
//! non-admin caller may see of other users.

pub mod handlers;

pub use handlers::selection_data;
