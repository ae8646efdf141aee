//! Email background job.
//!
//! Delivered over SMTP with lettre when `SMTP_HOST` is set. Without it the
//! rendered message is logged, which is enough for local development.

use lettre::{
    message::{header::ContentType, Mailbox}, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use serde::{Deserialize, Serialize};
use std::env;

use crate::config::{DEFAULT_SMTP_FROM, DEFAULT_SMTP_PORT};
use crate::errors::{AppError, AppResult};

const RESET_SUBJECT: &str = "Reset Password Notification";

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Optional sender override (defaults to SMTP_FROM)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    /// Create a new email job
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    /// Password reset notification carrying `url` as its action link.
    pub fn password_reset(to: impl Into<String>, url: &str, expire_minutes: i64) -> Self {
        let body = format!(
            "Hello!\n\n\
             You are receiving this email because we received a password reset request for your account.\n\n\
             Reset Password: {url}\n\n\
             This password reset link will expire in {expire_minutes} minutes.\n\n\
             If you did not request a password reset, no further action is required.\n"
        );

        Self::new(to, RESET_SUBJECT, body)
    }
}

/// SMTP settings read from the environment.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pass: Option<String>,
    pub from: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "[REDACTED]"))
            .field("from", &self.from)
            .finish()
    }
}

impl SmtpSettings {
    pub fn from_env() -> Self {
        Self {
            host: env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: env::var("SMTP_USER").ok(),
            pass: env::var("SMTP_PASS").ok(),
            from: env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_SMTP_FROM.to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    /// Build a transport; unauthenticated when no credentials are set.
    fn transport(&self, host: &str) -> AppResult<SmtpTransport> {
        let transport = match (&self.user, &self.pass) {
            (Some(user), Some(pass)) => SmtpTransport::relay(host)
                .map_err(|e| AppError::queue(format!("Invalid SMTP relay: {}", e)))?
                .port(self.port)
                .credentials(Credentials::new(user.clone(), pass.clone()))
                .build(),
            _ => SmtpTransport::builder_dangerous(host).port(self.port).build(),
        };

        Ok(transport)
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let settings = SmtpSettings::from_env();
    let from = job.from.clone().unwrap_or_else(|| settings.from.clone());

    tracing::info!(
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );

    let Some(host) = settings.host.clone() else {
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            from,
            job.to,
            job.subject,
            job.body
        );
        return Ok(());
    };

    let message = build_message(&job, &from)?;
    let mailer = settings.transport(&host)?;

    // lettre's blocking transport; keep it off the async workers
    tokio::task::spawn_blocking(move || mailer.send(&message))
        .await
        .map_err(|e| AppError::internal(format!("Mail task panicked: {}", e)))?
        .map_err(|e| AppError::queue(format!("SMTP delivery failed: {}", e)))?;

    tracing::info!(to = %job.to, "Email sent");
    Ok(())
}

fn build_message(job: &EmailJob, from: &str) -> AppResult<Message> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| AppError::queue(format!("Invalid sender address: {}", e)))?;
    let to: Mailbox = job
        .to
        .parse()
        .map_err(|e| AppError::queue(format!("Invalid recipient address: {}", e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(job.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(job.body.clone())
        .map_err(|e| AppError::queue(format!("Failed to build email: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_reset_email() {
        let url = "http://localhost:3000/password-reset/abc?email=jane@example.com";
        let job = EmailJob::password_reset("jane@example.com", url, 60);

        assert_eq!(job.to, "jane@example.com");
        assert_eq!(job.subject, "Reset Password Notification");
        assert!(job.body.contains(url));
        assert!(job.body.contains("will expire in 60 minutes"));
        assert!(job.from.is_none());
    }

    #[test]
    fn test_build_message() {
        let job = EmailJob {
            from: Some("me@example.com".into()),
            ..EmailJob::new("to@example.com", "Hi", "Body")
        };

        assert!(build_message(&job, "me@example.com").is_ok());
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let job = EmailJob::new("not an address", "Hi", "Body");

        let result = build_message(&job, "me@example.com");
        assert!(matches!(result, Err(AppError::Queue(_))));
    }

    #[test]
    fn test_job_payload_roundtrip_defaults_from() {
        let json = r#"{"to":"a@b.co","subject":"s","body":"b"}"#;
        let job: EmailJob = serde_json::from_str(json).unwrap();

        assert_eq!(job, EmailJob::new("a@b.co", "s", "b"));
    }

    #[test]
    fn test_smtp_debug_redacts_password() {
        let settings = SmtpSettings {
            host: Some("smtp.example.com".into()),
            port: 587,
            user: Some("mailer".into()),
            pass: Some("hunter2hunter2".into()),
            from: "noreply@example.com".into(),
        };

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("hunter2"));
        assert!(settings.is_configured());
    }
}
