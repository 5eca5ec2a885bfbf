//! Admin management API
//!
//! Cross-tenant views and mutations for administrators. Every route in this
//! module sits behind the role middleware, which answers 403 before any
//! handler here runs for a non-admin caller.

pub mod handlers;

pub use handlers::{
    list_all_users, list_canvases_admin, remove_canvas, remove_user, update_user_role,
};
