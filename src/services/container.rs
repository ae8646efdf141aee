//! Service Container - Centralized service access.
//!
//! Wires every service to one shared Unit of Work so the API state can
//! hand out trait objects without knowing the concrete types.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, PasswordResetManager, PasswordResetService, UserManager,
    UserService,
};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};
use crate::jobs::Notifier;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get password reset service
    fn password_resets(&self) -> Arc<dyn PasswordResetService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    password_reset_service: Arc<dyn PasswordResetService>,
}

impl Services {
    /// Build every service on top of an existing Unit of Work.
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        let password_reset_service = Arc::new(PasswordResetManager::new(
            uow.clone(),
            notifier,
            &config,
        ));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let auth_service = Arc::new(Authenticator::new(uow, config));

        Self {
            auth_service,
            user_service,
            password_reset_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self::new(Arc::new(Persistence::new(db)), notifier, config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn password_resets(&self) -> Arc<dyn PasswordResetService> {
        self.password_reset_service.clone()
    }
}
