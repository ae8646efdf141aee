//! Jobs command - Background job management.
//!
//! - `work`: Start the email worker
//! - `list`: Show job counts by status
//! - `clear`: Remove failed jobs from the queue

use apalis::prelude::*;

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, EMAIL_WORKER_NAME};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::jobs::{clear_failed_jobs, email_job_handler, queue_stats, EmailQueue, SmtpSettings};

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_jobs(&config).await,
    }
}

/// Start the background job worker
async fn run_worker(config: &Config) -> AppResult<()> {
    let queue = EmailQueue::connect(config).await?;

    let smtp = SmtpSettings::from_env();
    if smtp.is_configured() {
        tracing::info!(smtp = ?smtp, "Delivering email over SMTP");
    } else {
        tracing::warn!("SMTP_HOST not set - emails will be logged, not sent");
    }

    tracing::info!("Job worker started. Press Ctrl+C to stop.");

    let worker = WorkerBuilder::new(EMAIL_WORKER_NAME)
        .backend(queue.storage())
        .build_fn(email_job_handler);

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::queue(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped.");
    Ok(())
}

/// Print job counts by status
async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(config).await?;

    println!("\n=== Job Queue Status ===");
    match queue_stats(db.connection()).await? {
        Some(stats) => {
            println!("Pending:  {}", stats.pending);
            println!("Running:  {}", stats.running);
            println!("Failed:   {}", stats.failed);
            println!("Done:     {}", stats.done);
        }
        None => {
            println!("Job queue not initialized.");
            println!("Run 'jobs work' or 'serve' first to create the queue tables.");
        }
    }
    println!("========================\n");

    Ok(())
}

/// Clear failed jobs from the queue
async fn clear_jobs(config: &Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(config).await?;

    let count = clear_failed_jobs(db.connection()).await?;
    println!("Cleared {} failed job(s) from the queue.", count);

    Ok(())
}
