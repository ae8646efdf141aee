//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity, password hashing, and the password-reset link and token
//! rules shared by the HTTP layer and the mail job.

pub mod constants;
pub mod error;
pub mod password;
pub mod password_reset;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use password_reset::{CanResetPassword, ResetToken, ResetUrl};
pub use user::{User, UserResponse};
