//! Redis cache implementation.
//!
//! Holds a multiplexed connection manager and backs the fixed-window
//! request counters used by the rate-limit middleware.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use super::health::HealthProbe;
use crate::config::{Config, CACHE_HEALTH_KEY, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::AppResult;

/// Outcome of counting one request against a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Requests seen in the current window, including this one
    pub count: u64,
    pub limit: u64,
    /// Seconds until the window resets
    pub reset_after: u64,
}

impl RateLimitDecision {
    pub fn allowed(&self) -> bool {
        self.count <= self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}

/// Counts requests per key in fixed windows.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn hit(&self, key: &str, limit: u64, window_seconds: u64) -> AppResult<RateLimitDecision>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Increment the counter for `identifier` and report the window state.
    ///
    /// INCR and TTL run in one atomic pipeline. Any counter found without
    /// an expiry gets the window armed, including one whose first EXPIRE
    /// never landed.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitDecision> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let (count, ttl): (u64, i64) = redis::pipe()
            .atomic()
            .incr(&key, 1u64)
            .ttl(&key)
            .query_async(&mut conn)
            .await?;

        let reset_after = match expiry_to_arm(ttl, window_seconds) {
            Some(seconds) => {
                let _: () = conn.expire(&key, seconds).await?;
                window_seconds
            }
            None => ttl as u64,
        };

        Ok(RateLimitDecision {
            count,
            limit: max_requests,
            reset_after,
        })
    }
}

/// Expiry to set for a counter whose TTL is `ttl`, if it has none.
///
/// Redis reports -1 for a key without expiry and -2 for a missing key.
fn expiry_to_arm(ttl: i64, window_seconds: u64) -> Option<i64> {
    (ttl < 0).then_some(window_seconds as i64)
}

#[async_trait]
impl RateLimiter for Cache {
    async fn hit(&self, key: &str, limit: u64, window_seconds: u64) -> AppResult<RateLimitDecision> {
        self.check_rate_limit(key, limit, window_seconds).await
    }
}

#[async_trait]
impl HealthProbe for Cache {
    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(CACHE_HEALTH_KEY, "ok", 10).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_without_expiry_is_rearmed() {
        assert_eq!(expiry_to_arm(-1, 60), Some(60));
        assert_eq!(expiry_to_arm(-2, 60), Some(60));
    }

    #[test]
    fn test_running_window_keeps_its_expiry() {
        assert_eq!(expiry_to_arm(42, 60), None);
        assert_eq!(expiry_to_arm(0, 60), None);
    }

    #[test]
    fn test_decision_within_limit() {
        let decision = RateLimitDecision {
            count: 3,
            limit: 10,
            reset_after: 60,
        };

        assert!(decision.allowed());
        assert_eq!(decision.remaining(), 7);
    }

    #[test]
    fn test_decision_over_limit() {
        let decision = RateLimitDecision {
            count: 11,
            limit: 10,
            reset_after: 12,
        };

        assert!(!decision.allowed());
        assert_eq!(decision.remaining(), 0);
    }

    #[test]
    fn test_last_request_in_window_is_allowed() {
        let decision = RateLimitDecision {
            count: 10,
            limit: 10,
            reset_after: 1,
        };

        assert!(decision.allowed());
        assert_eq!(decision.remaining(), 0);
    }
}
