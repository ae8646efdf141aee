//! Connectivity probes for the health endpoint.

use async_trait::async_trait;

use crate::errors::AppResult;

/// A backing service the health endpoint can ping.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Round-trip a trivial command to the service.
    async fn ping(&self) -> AppResult<()>;
}
