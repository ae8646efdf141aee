//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, HealthProbe, RateLimiter};
use crate::jobs::Notifier;
use crate::services::{
    AuthService, PasswordResetService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Password reset service
    pub password_reset_service: Arc<dyn PasswordResetService>,
    /// Request counters for the rate-limit middleware
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Database connectivity probe
    pub database: Arc<dyn HealthProbe>,
    /// Redis connectivity probe
    pub cache: Arc<dyn HealthProbe>,
    /// Directory served under `/assets`
    pub assets_dir: PathBuf,
    /// Title used by the page shell
    pub app_name: String,
    /// Whether forwarded-for headers identify the client
    pub trust_proxy: bool,
}

impl AppState {
    /// Create application state from live connections and config.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        let services = Services::from_connection(database.get_connection(), notifier, config.clone());
        Self::new(&services, cache.clone(), database, cache, &config)
    }

    /// Create application state from an already built service container.
    pub fn new(
        services: &dyn ServiceContainer,
        rate_limiter: Arc<dyn RateLimiter>,
        database: Arc<dyn HealthProbe>,
        cache: Arc<dyn HealthProbe>,
        config: &Config,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            password_reset_service: services.password_resets(),
            rate_limiter,
            database,
            cache,
            assets_dir: config.assets_dir.clone(),
            app_name: config.app_name.clone(),
            trust_proxy: config.trust_proxy,
        }
    }
}
