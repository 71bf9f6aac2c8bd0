//! The user resource: codec, query building, CRUD operations and handlers

pub mod controller;
pub mod handlers;
pub mod model;
pub mod query;

pub use controller::UserController;
pub use model::{NewUser, User, UserUpdate};
pub use query::{UserQuery, UserQueryParams};
