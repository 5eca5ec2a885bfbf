//! Server assembly
//!
//! Startup wiring and the shared application state. The binary calls
//! [`init::create_app`]; integration tests build an [`state::AppState`]
//! by hand and go straight to the router.

pub mod init;
pub mod state;

pub use init::{connect_database, create_app, InitError};
pub use state::AppState;
