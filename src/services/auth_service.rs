//! Authentication service - Registration, login and access tokens.
//!
//! Passwords are hashed by the domain `Password` value object; tokens are
//! HS256 JWTs signed with the configured secret.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use domain::{Password, User};

/// Verified against when the email is unknown, so both paths hash once.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$ZHVtbXloYXNoMTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMg";

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Lower-cased, trimmed form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Sign an access token for `user`
    fn issue_token(&self, user: &User) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        let email = normalize_email(&email);
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("The name field is required"));
        }

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(name.to_string(), email, password_hash)
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = normalize_email(&email);
        let user = self.uow.users().find_by_email(&email).await?;

        let stored = Password::from_hash(
            user.as_ref()
                .map(|u| u.password_hash.as_str())
                .unwrap_or(DUMMY_HASH),
        );
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => self.issue_token(&user),
            _ => {
                tracing::warn!(email = %email, "Login failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn issue_token(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockPasswordResetRepository, MockUserRepository, PasswordResetRepository, UserRepository,
    };

    struct MockUow {
        users: Arc<MockUserRepository>,
    }

    impl UnitOfWork for MockUow {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn password_resets(&self) -> Arc<dyn PasswordResetRepository> {
            Arc::new(MockPasswordResetRepository::new())
        }
    }

    fn config() -> Config {
        Config::new("test-secret-key-that-is-long-enough!").unwrap()
    }

    fn service(users: MockUserRepository) -> Authenticator<MockUow> {
        Authenticator::new(
            Arc::new(MockUow {
                users: Arc::new(users),
            }),
            config(),
        )
    }

    fn stored_user(email: &str, plain: &str) -> User {
        User::new(
            Uuid::new_v4(),
            "Jane".to_string(),
            email.to_string(),
            Password::new(plain).unwrap().into_string(),
        )
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "jane@example.com")
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|name, email, hash| {
                name == "Jane" && email == "jane@example.com" && hash.starts_with("$argon2")
            })
            .returning(|name, email, hash| Ok(User::new(Uuid::new_v4(), name, email, hash)));

        let user = service(users)
            .register(" Jane ".into(), " Jane@Example.COM ".into(), "password123".into())
            .await
            .unwrap();

        assert_eq!(user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "password123"))));
        users.expect_create().never();

        let result = service(users)
            .register("Jane".into(), "jane@example.com".into(), "password123".into())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_lost_race_is_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .times(1)
            .returning(|_, _, _| Err(AppError::conflict("Email")));

        let result = service(users)
            .register("Jane".into(), "jane@example.com".into(), "password123".into())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(ref e)) if e == "Email"));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().never();
        users.expect_create().never();

        let result = service(users)
            .register("   ".into(), "jane@example.com".into(), "password123".into())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_success_and_token_roundtrip() {
        let user = stored_user("jane@example.com", "password123");
        let expected_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(users);
        let token = auth
            .login("JANE@example.com".into(), "password123".into())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, expected_id);
        assert_eq!(claims.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("jane@example.com", "password123");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(users)
            .login("jane@example.com".into(), "wrong-password".into())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let result = service(users)
            .login("ghost@example.com".into(), "password123".into())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let auth = service(MockUserRepository::new());
        assert!(matches!(auth.verify_token("not.a.jwt"), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let user = stored_user("jane@example.com", "password123");
        let other = Authenticator::new(
            Arc::new(MockUow {
                users: Arc::new(MockUserRepository::new()),
            }),
            Config::new("a-completely-different-secret-value!!").unwrap(),
        );
        let token = other.issue_token(&user).unwrap();

        let auth = service(MockUserRepository::new());
        assert!(auth.verify_token(&token.access_token).is_err());
    }
}
