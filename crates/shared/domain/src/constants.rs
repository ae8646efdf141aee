//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Schema
// =============================================================================

/// Default length of indexed string columns.
///
/// 191 characters keeps a unique index on a utf8mb4 column within the
/// 767-byte key prefix limit of older MySQL/MariaDB engines.
pub const DEFAULT_STRING_LENGTH: u32 = 191;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Longest accepted JWT lifetime in hours (one year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 8760;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Password Reset
// =============================================================================

/// Path segment of the front-end page that consumes reset links
pub const PASSWORD_RESET_PATH: &str = "password-reset";

/// Number of characters in a plain reset token
pub const RESET_TOKEN_LENGTH: usize = 64;

/// Minutes a reset token stays valid
pub const RESET_TOKEN_EXPIRE_MINUTES: i64 = 60;

/// Seconds a user must wait before requesting another reset link
pub const RESET_TOKEN_THROTTLE_SECONDS: i64 = 60;
