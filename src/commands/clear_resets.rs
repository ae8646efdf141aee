//! Clear-resets command - Purge expired password reset tokens.

use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};

/// Execute the clear-resets command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config).await?;
    let uow = Persistence::new(db.get_connection());

    let removed = purge_expired(&uow, config.reset_expire_minutes, Utc::now()).await?;

    tracing::info!(removed = removed, "Expired password reset tokens cleared");
    println!("Cleared {} expired reset token(s).", removed);
    Ok(())
}

/// Delete tokens older than `expire_minutes` as of `now`.
pub async fn purge_expired<U: UnitOfWork + ?Sized>(
    uow: &U,
    expire_minutes: i64,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let cutoff = now - Duration::minutes(expire_minutes);
    uow.password_resets().delete_expired(cutoff).await
}
