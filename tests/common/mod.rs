//! Shared harness for integration tests.
//!
//! Builds the real router over in-memory repositories, a recording
//! notifier and an always-allow rate limiter, so requests exercise every
//! layer except Postgres, Redis and SMTP.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use auth_portal::api::{create_router, AppState};
use auth_portal::config::Config;
use auth_portal::errors::{AppError, AppResult};
use auth_portal::infra::{
    HealthProbe, PasswordResetRecord, PasswordResetRepository, RateLimitDecision, RateLimiter,
    UnitOfWork, UserRepository,
};
use auth_portal::jobs::{EmailJob, Notifier};
use auth_portal::services::Services;
use domain::{Password, User};

pub const TEST_SECRET: &str = "integration-test-secret-32-chars!!";
pub const FRONTEND_URL: &str = "https://app.example.com";

// =============================================================================
// In-memory persistence
// =============================================================================

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn list_all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        // Mirrors the unique index on users.email
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::conflict("Email"));
        }
        let user = User::new(Uuid::new_v4(), name, email, password_hash);
        users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)?;
        user.change_password(password_hash);
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct InMemoryResets {
    tokens: Mutex<HashMap<String, PasswordResetRecord>>,
}

impl InMemoryResets {
    /// Pretend the stored token for `email` was created `age` earlier.
    pub fn backdate(&self, email: &str, age: Duration) {
        if let Some(record) = self.tokens.lock().unwrap().get_mut(email) {
            record.created_at = record.created_at - age;
        }
    }

    pub fn get(&self, email: &str) -> Option<PasswordResetRecord> {
        self.tokens.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryResets {
    async fn find(&self, email: &str) -> AppResult<Option<PasswordResetRecord>> {
        Ok(self.get(email))
    }

    async fn upsert(&self, email: &str, token_digest: &str) -> AppResult<PasswordResetRecord> {
        let record = PasswordResetRecord {
            email: email.to_string(),
            token: token_digest.to_string(),
            created_at: Utc::now(),
        };
        self.tokens
            .lock()
            .unwrap()
            .insert(email.to_string(), record.clone());
        Ok(record)
    }

    async fn delete(&self, email: &str) -> AppResult<()> {
        self.tokens.lock().unwrap().remove(email);
        Ok(())
    }

    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, r| r.created_at >= cutoff);
        Ok((before - tokens.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    pub users: Arc<InMemoryUsers>,
    pub resets: Arc<InMemoryResets>,
}

impl UnitOfWork for InMemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn password_resets(&self) -> Arc<dyn PasswordResetRepository> {
        self.resets.clone()
    }
}

// =============================================================================
// Infrastructure doubles
// =============================================================================

/// Keeps every dispatched email for inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailJob>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<EmailJob> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<EmailJob> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, job: EmailJob) -> AppResult<()> {
        self.sent.lock().unwrap().push(job);
        Ok(())
    }
}

pub struct AllowAll;

#[async_trait]
impl RateLimiter for AllowAll {
    async fn hit(&self, _key: &str, limit: u64, window_seconds: u64) -> AppResult<RateLimitDecision> {
        Ok(RateLimitDecision {
            count: 1,
            limit,
            reset_after: window_seconds,
        })
    }
}

/// Reports every window as already full.
pub struct DenyAll;

#[async_trait]
impl RateLimiter for DenyAll {
    async fn hit(&self, _key: &str, limit: u64, _window_seconds: u64) -> AppResult<RateLimitDecision> {
        Ok(RateLimitDecision {
            count: limit + 1,
            limit,
            reset_after: 42,
        })
    }
}

/// Allows everything and remembers the keys it was asked about.
#[derive(Default)]
pub struct RecordingLimiter {
    keys: Mutex<Vec<String>>,
}

impl RecordingLimiter {
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateLimiter for RecordingLimiter {
    async fn hit(&self, key: &str, limit: u64, window_seconds: u64) -> AppResult<RateLimitDecision> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(RateLimitDecision {
            count: 1,
            limit,
            reset_after: window_seconds,
        })
    }
}

/// Limiter whose backend is unreachable.
pub struct BrokenLimiter;

#[async_trait]
impl RateLimiter for BrokenLimiter {
    async fn hit(&self, _key: &str, _limit: u64, _window_seconds: u64) -> AppResult<RateLimitDecision> {
        Err(AppError::internal("connection refused"))
    }
}

pub struct Probe {
    pub healthy: bool,
}

#[async_trait]
impl HealthProbe for Probe {
    async fn ping(&self) -> AppResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::internal("connection refused"))
        }
    }
}

// =============================================================================
// Test application
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub config: Config,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"].as_str().unwrap().to_string()
    }
}

pub fn test_config() -> Config {
    let mut config = Config::new(TEST_SECRET).unwrap();
    config.frontend_url = FRONTEND_URL.to_string();
    config
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(Arc::new(AllowAll), true, true)
    }

    pub fn build(rate_limiter: Arc<dyn RateLimiter>, database_up: bool, cache_up: bool) -> Self {
        let config = test_config();
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let services = Services::new(store.clone(), notifier.clone(), config.clone());
        let state = AppState::new(
            &services,
            rate_limiter,
            Arc::new(Probe { healthy: database_up }),
            Arc::new(Probe { healthy: cache_up }),
            &config,
        );

        Self {
            router: create_router(state),
            store,
            notifier,
            config,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    /// Insert a user directly, bypassing the API.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str) -> User {
        let hash = Password::new(password).unwrap().into_string();
        self.store
            .users
            .create(name.to_string(), email.to_string(), hash)
            .await
            .unwrap()
    }

    /// Plain token carried by the most recent reset email.
    pub fn last_reset_token(&self) -> String {
        let job = self.notifier.last().expect("no email sent");
        let marker = "/password-reset/";
        let start = job.body.find(marker).expect("no reset link") + marker.len();
        let rest = &job.body[start..];
        let end = rest.find('?').expect("no email query");
        rest[..end].to_string()
    }
}
