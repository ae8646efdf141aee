//! Password reset token repository.
//!
//! Tokens are keyed by email, so storing a new one replaces the previous.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::entities::password_reset_token::{self, ActiveModel, Entity as ResetTokenEntity};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Stored reset token for one email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRecord {
    pub email: String,
    /// Digest of the plain token
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl From<password_reset_token::Model> for PasswordResetRecord {
    fn from(model: password_reset_token::Model) -> Self {
        Self {
            email: model.email,
            token: model.token,
            created_at: model.created_at,
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Token currently stored for `email`
    async fn find(&self, email: &str) -> AppResult<Option<PasswordResetRecord>>;

    /// Store `token_digest` for `email`, replacing any previous token
    async fn upsert(&self, email: &str, token_digest: &str) -> AppResult<PasswordResetRecord>;

    /// Remove the token stored for `email`
    async fn delete(&self, email: &str) -> AppResult<()>;

    /// Remove tokens created before `cutoff`; returns the number removed
    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// SeaORM-backed token storage
pub struct PasswordResetStore {
    db: DatabaseConnection,
}

impl PasswordResetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PasswordResetRepository for PasswordResetStore {
    async fn find(&self, email: &str) -> AppResult<Option<PasswordResetRecord>> {
        let result = ResetTokenEntity::find_by_id(email.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(PasswordResetRecord::from))
    }

    async fn upsert(&self, email: &str, token_digest: &str) -> AppResult<PasswordResetRecord> {
        let record = PasswordResetRecord {
            email: email.to_string(),
            token: token_digest.to_string(),
            created_at: Utc::now(),
        };

        let active_model = ActiveModel {
            email: Set(record.email.clone()),
            token: Set(record.token.clone()),
            created_at: Set(record.created_at),
        };

        ResetTokenEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(password_reset_token::Column::Email)
                    .update_columns([
                        password_reset_token::Column::Token,
                        password_reset_token::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(record)
    }

    async fn delete(&self, email: &str) -> AppResult<()> {
        ResetTokenEntity::delete_by_id(email.to_string())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = ResetTokenEntity::delete_many()
            .filter(password_reset_token::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
