//! Postgres-backed email queue and its maintenance queries.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use super::{EmailJob, Notifier};
use crate::config::{Config, JOB_POOL_MAX_CONNECTIONS};
use crate::errors::{AppError, AppResult};

const SCHEMA_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') as exists";

/// Queue handle used by the web process to enqueue mail.
#[derive(Clone)]
pub struct EmailQueue {
    storage: PostgresStorage<EmailJob>,
}

impl EmailQueue {
    /// Connect a dedicated pool and make sure the apalis tables exist.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(JOB_POOL_MAX_CONNECTIONS)
            .connect(&config.database_url)
            .await
            .map_err(|e| AppError::queue(format!("Failed to connect job storage: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::queue(format!("Failed to setup job storage: {}", e)))?;

        Ok(Self {
            storage: PostgresStorage::new(pool),
        })
    }

    pub fn storage(&self) -> PostgresStorage<EmailJob> {
        self.storage.clone()
    }
}

#[async_trait]
impl Notifier for EmailQueue {
    async fn send(&self, job: EmailJob) -> AppResult<()> {
        let mut storage = self.storage.clone();
        let to = job.to.clone();

        storage
            .push(job)
            .await
            .map_err(|e| AppError::queue(format!("Failed to enqueue email: {}", e)))?;

        tracing::debug!(to = %to, "Email job queued");
        Ok(())
    }
}

/// Job counts by status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub pending: i64,
    pub running: i64,
    pub failed: i64,
    pub done: i64,
}

async fn schema_exists(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            SCHEMA_EXISTS_SQL.to_string(),
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

/// Count jobs by status. `None` when the queue tables were never created.
pub async fn queue_stats(db: &DatabaseConnection) -> AppResult<Option<QueueStats>> {
    if !schema_exists(db).await? {
        return Ok(None);
    }

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text as status, COUNT(*)::bigint as count FROM apalis.jobs GROUP BY status".to_string(),
        ))
        .await?;

    let mut stats = QueueStats::default();
    for row in rows {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            match status.as_str() {
                "Pending" => stats.pending = count,
                "Running" => stats.running = count,
                "Failed" | "Killed" => stats.failed += count,
                "Done" => stats.done = count,
                _ => {}
            }
        }
    }

    Ok(Some(stats))
}

/// Delete failed jobs; returns the number removed.
pub async fn clear_failed_jobs(db: &DatabaseConnection) -> AppResult<u64> {
    if !schema_exists(db).await? {
        return Ok(0);
    }

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status IN ('Failed', 'Killed')".to_string(),
        ))
        .await?;

    Ok(result.rows_affected())
}
