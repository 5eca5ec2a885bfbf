//! Database integration tests
//!
//! Exercise the migrations and the cascade behavior directly against a
//! migrated in-memory database.

pub mod migrations_test;
