//! Password reset links and tokens.
//!
//! A reset link points at the single-page front-end rather than at the API:
//! `{frontend_url}/password-reset/{token}?email={email}`. The front-end page
//! reads the token and email from the URL and posts them back to
//! `/api/reset-password`.
//!
//! Plain tokens only ever leave the server inside the link. Storage keeps the
//! SHA-256 hex digest.

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

use crate::constants::{PASSWORD_RESET_PATH, RESET_TOKEN_LENGTH};

/// Anything that can receive a password reset notification.
pub trait CanResetPassword {
    /// Address the reset link is bound to.
    fn email_for_password_reset(&self) -> &str;
}

/// Builds the URL embedded in password reset notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetUrl {
    frontend_url: String,
}

impl ResetUrl {
    /// Create a builder rooted at the front-end base URL.
    pub fn new(frontend_url: impl Into<String>) -> Self {
        let frontend_url = frontend_url.into();
        let trimmed = frontend_url.strip_suffix('/').unwrap_or(&frontend_url);
        Self {
            frontend_url: trimmed.to_string(),
        }
    }

    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    /// Link for `notifiable` carrying the plain `token`.
    pub fn build<N>(&self, notifiable: &N, token: &str) -> String
    where
        N: CanResetPassword + ?Sized,
    {
        format!(
            "{}/{}/{}?email={}",
            self.frontend_url,
            PASSWORD_RESET_PATH,
            token,
            notifiable.email_for_password_reset()
        )
    }
}

/// Reset token helpers.
pub struct ResetToken;

impl ResetToken {
    /// Generate a new token. Returns `(plain, digest)`.
    pub fn generate() -> (String, String) {
        let plain: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        let digest = Self::digest(&plain);

        (plain, digest)
    }

    /// SHA-256 hex digest of a plain token (64 characters).
    pub fn digest(plain: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plain.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Check a plain token against a stored digest in constant time.
    pub fn matches(plain: &str, stored_digest: &str) -> bool {
        let computed = Self::digest(plain);
        if computed.len() != stored_digest.len() {
            return false;
        }

        computed
            .bytes()
            .zip(stored_digest.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// A token created at `created_at` is expired once `expire_minutes` have passed.
    pub fn is_expired(created_at: DateTime<Utc>, now: DateTime<Utc>, expire_minutes: i64) -> bool {
        created_at + Duration::minutes(expire_minutes) < now
    }

    /// A new link may not be issued while the previous one is younger than `throttle_seconds`.
    pub fn is_throttled(created_at: DateTime<Utc>, now: DateTime<Utc>, throttle_seconds: i64) -> bool {
        throttle_seconds > 0 && created_at + Duration::seconds(throttle_seconds) > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Notifiable(&'static str);

    impl CanResetPassword for Notifiable {
        fn email_for_password_reset(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_reset_url_format() {
        let urls = ResetUrl::new("https://app.example.com");
        let url = urls.build(&Notifiable("jane@example.com"), "abc123");

        assert_eq!(
            url,
            "https://app.example.com/password-reset/abc123?email=jane@example.com"
        );
    }

    #[test]
    fn test_reset_url_holds_for_any_token_and_email() {
        let urls = ResetUrl::new("http://localhost:3000");

        for (email, token) in [
            ("a@b.co", "t"),
            ("first.last+tag@example.org", "Zx9"),
            ("UPPER@EXAMPLE.COM", "0000000000"),
        ] {
            let url = urls.build(&Notifiable(email), token);
            assert_eq!(
                url,
                format!("http://localhost:3000/password-reset/{}?email={}", token, email)
            );
        }
    }

    #[test]
    fn test_reset_url_trims_trailing_slash() {
        let urls = ResetUrl::new("https://app.example.com/");

        assert_eq!(urls.frontend_url(), "https://app.example.com");
        assert_eq!(
            urls.build(&Notifiable("x@y.z"), "tok"),
            "https://app.example.com/password-reset/tok?email=x@y.z"
        );
    }

    #[test]
    fn test_generated_token_shape() {
        let (plain, digest) = ResetToken::generate();

        assert_eq!(plain.len(), RESET_TOKEN_LENGTH);
        assert!(plain.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, ResetToken::digest(&plain));
    }

    #[test]
    fn test_generated_tokens_differ() {
        let (first, _) = ResetToken::generate();
        let (second, _) = ResetToken::generate();

        assert_ne!(first, second);
    }

    #[test]
    fn test_token_matching() {
        let (plain, digest) = ResetToken::generate();

        assert!(ResetToken::matches(&plain, &digest));
        assert!(!ResetToken::matches("wrong", &digest));
        assert!(!ResetToken::matches(&plain, "short"));
    }

    #[test]
    fn test_expiry_window() {
        let created = Utc::now();

        assert!(!ResetToken::is_expired(created, created + Duration::minutes(59), 60));
        assert!(!ResetToken::is_expired(created, created + Duration::minutes(60), 60));
        assert!(ResetToken::is_expired(created, created + Duration::minutes(61), 60));
    }

    #[test]
    fn test_throttle_window() {
        let created = Utc::now();

        assert!(ResetToken::is_throttled(created, created + Duration::seconds(30), 60));
        assert!(!ResetToken::is_throttled(created, created + Duration::seconds(61), 60));
        assert!(!ResetToken::is_throttled(created, created, 0));
    }
}
