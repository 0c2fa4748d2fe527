use crate::{ProbeError, StatusResponse};
use craftwatch_models::Edition;
use std::time::Duration;

/// Status-query capability: resolves an address into a queryable handle
#[async_trait::async_trait]
pub trait StatusBackend: Send + Sync {
    /// Builds a handle for `host:port` (port optional, defaults per edition)
    async fn lookup(
        &self,
        edition: Edition,
        address: &str,
    ) -> Result<Box<dyn ServerHandle>, ProbeError>;
}

/// A server that can be asked for its status.
///
/// Handles that cannot honor a per-call timeout return
/// [`ProbeError::TimeoutUnsupported`] when given one; callers then retry
/// without it under an [`AmbientTimeoutGuard`](crate::AmbientTimeoutGuard).
#[async_trait::async_trait]
pub trait ServerHandle: Send + Sync {
    async fn status(&self, timeout: Option<Duration>) -> Result<StatusResponse, ProbeError>;

    /// Round-trip latency in milliseconds
    async fn ping(&self, timeout: Option<Duration>) -> Result<f64, ProbeError>;
}
