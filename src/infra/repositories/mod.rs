//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod password_reset_repository;
mod user_repository;

pub use password_reset_repository::{PasswordResetRecord, PasswordResetRepository, PasswordResetStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use password_reset_repository::MockPasswordResetRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
