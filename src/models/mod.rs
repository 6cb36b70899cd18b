//! Data models
//!
//! Database entities and input types shared between the service and API
//! layers.

mod session;
mod todo;
mod user;

pub use session::Session;
pub use todo::{CreateTodoInput, Todo, UpdateTodoInput};
pub use user::User;
