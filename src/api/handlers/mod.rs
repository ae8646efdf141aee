//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod password_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use health_handler::health;
pub use password_handler::password_routes;
pub use user_handler::{current_user_routes, user_routes};
