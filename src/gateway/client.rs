use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::types::DashboardError;

use super::api::{
    DemoResponse, HealthResponse, NextSequenceResponse, ReleaseRequest, ReleaseResponse,
    ResetResponse, SequenceQuery, StatsResponse, DEMO_PATH_PREFIX, HEALTH_PATH,
    NEXT_SEQUENCE_PATH, RELEASE_PATH, RESET_PATH, STATS_PATH,
};
use super::helpers::{error_detail, join_url, require_identifier, require_path_segment};
use super::{GatewayError, Operation, SequenceApi};

/// reqwest-backed gateway to the sequence service REST API.
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, DashboardError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(DashboardError::Http)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json_with_query<T, Q>(
        &self,
        operation: Operation,
        path: &str,
        query: &Q,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(join_url(&self.base_url, path)).query(query);
        self.send(operation, path, request).await
    }

    async fn post_json<T, B>(
        &self,
        operation: Operation,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.post(join_url(&self.base_url, path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(operation, path, request).await
    }

    async fn send<T>(
        &self,
        operation: Operation,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        debug!(operation = %operation, path, "Dispatching request");
        let response = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are best-effort; a failed read leaves the status alone
            let detail = response.text().await.ok().as_deref().and_then(error_detail);
            warn!(operation = %operation, path, %status, detail = ?detail, "Request rejected");
            return Err(GatewayError::Status {
                operation,
                status,
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GatewayError::Transport { operation, source })
    }
}

#[async_trait]
impl SequenceApi for HttpGateway {
    async fn next_sequence(
        &self,
        site_id: &str,
        partition_id: &str,
        invoice_type: &str,
    ) -> Result<NextSequenceResponse, GatewayError> {
        let operation = Operation::NextSequence;
        require_identifier(operation, "siteId", site_id)?;
        require_identifier(operation, "partitionId", partition_id)?;
        require_identifier(operation, "invoiceType", invoice_type)?;

        let query = SequenceQuery {
            site_id,
            partition_id,
            invoice_type,
        };
        self.get_json_with_query(operation, NEXT_SEQUENCE_PATH, &query)
            .await
    }

    async fn stats(&self) -> Result<StatsResponse, GatewayError> {
        self.get_json_with_query(Operation::Stats, STATS_PATH, &())
            .await
    }

    async fn health(&self) -> Result<HealthResponse, GatewayError> {
        self.get_json_with_query(Operation::Health, HEALTH_PATH, &())
            .await
    }

    async fn release(&self, request: &ReleaseRequest) -> Result<ReleaseResponse, GatewayError> {
        let operation = Operation::Release;
        require_identifier(operation, "siteId", &request.site_id)?;
        require_identifier(operation, "partitionId", &request.partition_id)?;

        self.post_json(operation, RELEASE_PATH, Some(request)).await
    }

    async fn reset(&self) -> Result<ResetResponse, GatewayError> {
        self.post_json::<_, ()>(Operation::Reset, RESET_PATH, None)
            .await
    }

    async fn run_demo(&self, demo_type: &str) -> Result<DemoResponse, GatewayError> {
        let operation = Operation::Demo;
        require_path_segment(operation, "demoType", demo_type)?;

        let path = format!("{}/{}", DEMO_PATH_PREFIX, demo_type.trim());
        self.post_json::<_, ()>(operation, &path, None).await
    }
}
