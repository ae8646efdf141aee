//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password_reset::CanResetPassword;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Set once the address has been confirmed
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user
    pub fn new(id: Uuid, name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            email_verified_at: None,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored password hash
    pub fn change_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

impl CanResetPassword for User {
    fn email_for_password_reset(&self) -> &str {
        &self.email
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    #[cfg_attr(feature = "openapi", schema(example = "550e8400-e29b-41d4-a716-446655440000"))]
    pub id: Uuid,
    /// User display name
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: String,
    /// User email address
    #[cfg_attr(feature = "openapi", schema(example = "user@example.com"))]
    pub email: String,
    /// Email verification timestamp
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            Uuid::new_v4(),
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "$argon2id$v=19$secret".to_string(),
        )
    }

    #[test]
    fn test_serialized_user_hides_password_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "jane@example.com");
    }

    #[test]
    fn test_new_user_is_unverified() {
        let user = sample_user();

        assert!(user.email_verified_at.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_change_password_touches_updated_at() {
        let mut user = sample_user();
        let before = user.updated_at;

        user.change_password("new-hash".to_string());

        assert_eq!(user.password_hash, "new-hash");
        assert!(user.updated_at >= before);
    }

    #[test]
    fn test_response_copies_public_fields() {
        let user = sample_user();
        let response = UserResponse::from(&user);

        assert_eq!(response.id, user.id);
        assert_eq!(response.name, user.name);
        assert_eq!(response.email_verified_at, None);
    }
}
