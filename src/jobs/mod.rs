//! Background jobs - Email delivery through an apalis queue.
//!
//! Request handlers never talk to SMTP directly. They hand an [`EmailJob`]
//! to a [`Notifier`]; the production notifier pushes onto the Postgres
//! backed queue and `jobs work` delivers it.

use async_trait::async_trait;

use crate::errors::AppResult;

mod email_job;
mod queue;

pub use email_job::{email_job_handler, EmailJob, SmtpSettings};
pub use queue::{clear_failed_jobs, queue_stats, EmailQueue, QueueStats};

#[cfg(test)]
use mockall::automock;

/// Dispatches outgoing notifications.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, job: EmailJob) -> AppResult<()>;
}
