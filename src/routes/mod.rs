//! HTTP routing
//!
//! Assembles the route groups from the domain modules and stacks the
//! middleware. See [`router::create_router`] for the full layout.

pub mod router;

pub use router::create_router;
