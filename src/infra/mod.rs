//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Redis cache (rate-limit counters)
//! - Health probes
//! - Unit of Work for repository access

pub mod cache;
pub mod db;
pub mod health;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitDecision, RateLimiter};
pub use db::{Database, Migrator};
pub use health::HealthProbe;
pub use repositories::{
    PasswordResetRecord, PasswordResetRepository, PasswordResetStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(test)]
pub use repositories::{MockPasswordResetRepository, MockUserRepository};
