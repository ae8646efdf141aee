//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) and reach
//! repositories through the Unit of Work.

mod auth_service;
pub mod container;
mod password_reset_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{normalize_email, AuthService, Authenticator, Claims, TokenResponse};
pub use password_reset_service::{PasswordResetManager, PasswordResetService};
pub use user_service::{UserManager, UserService};
