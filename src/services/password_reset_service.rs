//! Password reset service - Reset links and password replacement.
//!
//! One token per email. Requesting a new link replaces the stored token,
//! a successful reset consumes it.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::config::{
    Config, MESSAGE_INVALID_TOKEN, MESSAGE_INVALID_USER, MESSAGE_RESET_THROTTLED,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::jobs::{EmailJob, Notifier};
use crate::services::auth_service::normalize_email;
use domain::{Password, ResetToken, ResetUrl, User};

#[async_trait]
pub trait PasswordResetService: Send + Sync {
    /// Store a fresh token for `email` and dispatch the reset link.
    async fn send_reset_link(&self, email: &str) -> AppResult<()>;

    /// Replace the password when `token` is valid for `email`.
    async fn reset(&self, email: &str, token: &str, password: &str) -> AppResult<()>;
}

pub struct PasswordResetManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
    urls: ResetUrl,
    expire_minutes: i64,
    throttle_seconds: i64,
}

impl<U: UnitOfWork> PasswordResetManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>, config: &Config) -> Self {
        Self {
            uow,
            notifier,
            urls: ResetUrl::new(config.frontend_url.clone()),
            expire_minutes: config.reset_expire_minutes,
            throttle_seconds: config.reset_throttle_seconds,
        }
    }

    async fn find_user(&self, email: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::validation(MESSAGE_INVALID_USER))
    }
}

#[async_trait]
impl<U: UnitOfWork> PasswordResetService for PasswordResetManager<U> {
    async fn send_reset_link(&self, email: &str) -> AppResult<()> {
        let user = self.find_user(email).await?;
        let resets = self.uow.password_resets();
        let now = Utc::now();

        if let Some(existing) = resets.find(&user.email).await? {
            if ResetToken::is_throttled(existing.created_at, now, self.throttle_seconds) {
                let elapsed = (now - existing.created_at).num_seconds().max(0);
                let retry_after = (self.throttle_seconds - elapsed).max(1) as u64;
                return Err(AppError::too_many_requests(
                    MESSAGE_RESET_THROTTLED,
                    Some(retry_after),
                ));
            }
        }

        let (plain, digest) = ResetToken::generate();
        resets.upsert(&user.email, &digest).await?;

        let url = self.urls.build(&user, &plain);
        self.notifier
            .send(EmailJob::password_reset(&user.email, &url, self.expire_minutes))
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Password reset link dispatched");
        Ok(())
    }

    async fn reset(&self, email: &str, token: &str, password: &str) -> AppResult<()> {
        let user = self.find_user(email).await?;
        let resets = self.uow.password_resets();

        let record = resets
            .find(&user.email)
            .await?
            .filter(|r| !ResetToken::is_expired(r.created_at, Utc::now(), self.expire_minutes))
            .filter(|r| ResetToken::matches(token, &r.token))
            .ok_or_else(|| AppError::validation(MESSAGE_INVALID_TOKEN))?;

        let password_hash = Password::new(password)?.into_string();
        self.uow
            .users()
            .update_password(user.id, password_hash)
            .await?;
        resets.delete(&record.email).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Password reset");
        Ok(())
    }
}
