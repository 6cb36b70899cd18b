//! Services layer - business logic
//!
//! Services own the rules: credential verification, session lifecycle, and
//! user-scoped todo management. Repositories do the SQL; handlers do the HTTP.

pub mod auth;
pub mod password;
pub mod session;
pub mod todo;

pub use auth::{AuthService, AuthServiceError, SignUpInput};
pub use password::{hash_password, verify_password};
pub use session::{SessionError, SessionService};
pub use todo::{TodoService, TodoServiceError};
