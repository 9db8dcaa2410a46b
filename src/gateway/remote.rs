use async_trait::async_trait;

use super::api::{
    DemoResponse, HealthResponse, NextSequenceResponse, ReleaseRequest, ReleaseResponse,
    ResetResponse, StatsResponse,
};
use super::GatewayError;

/// Typed access to the remote sequence service.
///
/// Implementations return decoded payloads as-is: no caching, no retries, and no
/// interpretation of `success` flags. Every failure carries the attempted operation.
#[async_trait]
pub trait SequenceApi: Send + Sync {
    async fn next_sequence(
        &self,
        site_id: &str,
        partition_id: &str,
        invoice_type: &str,
    ) -> Result<NextSequenceResponse, GatewayError>;

    async fn stats(&self) -> Result<StatsResponse, GatewayError>;

    async fn health(&self) -> Result<HealthResponse, GatewayError>;

    async fn release(&self, request: &ReleaseRequest) -> Result<ReleaseResponse, GatewayError>;

    async fn reset(&self) -> Result<ResetResponse, GatewayError>;

    async fn run_demo(&self, demo_type: &str) -> Result<DemoResponse, GatewayError>;
}
