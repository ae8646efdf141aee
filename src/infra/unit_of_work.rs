//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository behind one injectable handle,
//! so services depend on a single abstraction instead of each store.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    PasswordResetRepository, PasswordResetStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get password reset token repository
    fn password_resets(&self) -> Arc<dyn PasswordResetRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    reset_repo: Arc<PasswordResetStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            reset_repo: Arc::new(PasswordResetStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn password_resets(&self) -> Arc<dyn PasswordResetRepository> {
        self.reset_repo.clone()
    }
}
