//! Database layer
//!
//! SQLite access for the Tido backend: pool creation, schema bootstrap, and
//! the repositories that own all SQL in the crate.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
