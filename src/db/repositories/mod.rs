//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the SQL for a specific entity; no other module in
//! the crate issues queries.

pub mod session;
pub mod todo;
pub mod user;

pub use session::{SessionRepository, SqlxSessionRepository};
pub use todo::{SqlxTodoRepository, TodoRepository};
pub use user::{SqlxUserRepository, UserRepository};

/// Check whether an error chain bottoms out in a store unique-constraint
/// violation.
///
/// Signup and token-issuance races are resolved by the database's unique
/// constraints; the services use this to translate those violations into their
/// own error types instead of leaking driver errors.
pub fn unique_violation_message(err: &anyhow::Error) -> Option<String> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .filter_map(|e| e.as_database_error())
        .find(|db| db.is_unique_violation())
        .map(|db| db.message().to_string())
}
