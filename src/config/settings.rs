//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_APP_NAME, DEFAULT_ASSETS_DIR, DEFAULT_DATABASE_URL, DEFAULT_FRONTEND_URL,
    DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};
use crate::errors::{AppError, AppResult};
use domain::{
    DEFAULT_JWT_EXPIRATION_HOURS, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
    RESET_TOKEN_EXPIRE_MINUTES, RESET_TOKEN_THROTTLE_SECONDS,
};

/// Insecure secret used only by debug builds when JWT_SECRET is unset.
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Base URL of the single-page front-end (reset links point here)
    pub frontend_url: String,
    pub assets_dir: PathBuf,
    pub app_name: String,
    pub reset_expire_minutes: i64,
    pub reset_throttle_seconds: i64,
    /// Take client addresses from X-Forwarded-For / X-Real-IP
    pub trust_proxy: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("frontend_url", &self.frontend_url)
            .field("assets_dir", &self.assets_dir)
            .field("app_name", &self.app_name)
            .field("reset_expire_minutes", &self.reset_expire_minutes)
            .field("reset_throttle_seconds", &self.reset_throttle_seconds)
            .field("trust_proxy", &self.trust_proxy)
            .finish()
    }
}

impl Config {
    /// Configuration with development defaults and the given signing secret.
    ///
    /// # Errors
    /// Returns a validation error if the secret is shorter than
    /// `MIN_JWT_SECRET_LENGTH` characters.
    pub fn new(jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            app_name: DEFAULT_APP_NAME.to_string(),
            reset_expire_minutes: RESET_TOKEN_EXPIRE_MINUTES,
            reset_throttle_seconds: RESET_TOKEN_THROTTLE_SECONDS,
            trust_proxy: false,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy` beforehand to pick up a `.env` file.
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in a release build or too short.
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::validation(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let mut config = Self::new(jwt_secret)?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(url) = env::var("REDIS_URL") {
            config.redis_url = url;
        }
        if let Some(hours) = parse_var("JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = check_expiration_hours(hours)?;
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = parse_var("SERVER_PORT") {
            config.server_port = port;
        }
        if let Ok(url) = env::var("FRONTEND_URL") {
            config.frontend_url = url;
        }
        if let Ok(dir) = env::var("ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Ok(name) = env::var("APP_NAME") {
            config.app_name = name;
        }
        if let Some(minutes) = parse_var("PASSWORD_RESET_EXPIRE_MINUTES") {
            config.reset_expire_minutes = minutes;
        }
        if let Some(seconds) = parse_var("PASSWORD_RESET_THROTTLE_SECONDS") {
            config.reset_throttle_seconds = seconds;
        }
        if let Some(trust) = parse_var("TRUST_PROXY") {
            config.trust_proxy = trust;
        }

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Token lifetimes must be positive and at most `MAX_JWT_EXPIRATION_HOURS`.
fn check_expiration_hours(hours: i64) -> AppResult<i64> {
    if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&hours) {
        return Err(AppError::validation(format!(
            "JWT_EXPIRATION_HOURS must be between 1 and {}",
            MAX_JWT_EXPIRATION_HOURS
        )));
    }
    Ok(hours)
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
