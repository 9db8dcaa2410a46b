//! Scripted gateway for exercising the session without a server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::Config;
use crate::gateway::api::StatsResponse;
use crate::gateway::{
    DemoResponse, GatewayError, HealthResponse, NextSequenceResponse, Operation, ReleaseRequest,
    ReleaseResponse, ResetResponse, SequenceApi,
};
use crate::session::DashboardSession;

type Scripted<T> = Mutex<VecDeque<(Duration, Result<T, GatewayError>)>>;

/// Replies are consumed in call order; an empty script yields a plain success.
#[derive(Default)]
pub(crate) struct FakeGateway {
    next: Scripted<NextSequenceResponse>,
    stats: Scripted<StatsResponse>,
    health: Scripted<HealthResponse>,
    release: Scripted<ReleaseResponse>,
    reset: Scripted<ResetResponse>,
    demo: Scripted<DemoResponse>,
    calls: Mutex<Vec<Operation>>,
    releases: Mutex<Vec<ReleaseRequest>>,
}

pub(crate) fn unavailable(operation: Operation) -> GatewayError {
    GatewayError::Status {
        operation,
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: None,
    }
}

pub(crate) fn issued(sequence: u64, gap_filled: bool) -> NextSequenceResponse {
    NextSequenceResponse {
        success: true,
        sequence_numbers: vec![sequence],
        gap_filled,
        node_id: Some("node-1".to_string()),
        processing_time_ms: Some(4),
        ..Default::default()
    }
}

pub(crate) fn counter_stats(counter: u64) -> StatsResponse {
    StatsResponse {
        current_counter: Some(counter),
        ..Default::default()
    }
}

fn push<T>(script: &Scripted<T>, delay: Duration, reply: Result<T, GatewayError>) {
    script
        .lock()
        .unwrap()
        .push_back((delay, reply));
}

async fn reply<T: Default>(script: &Scripted<T>) -> Result<T, GatewayError> {
    let next = script.lock().unwrap().pop_front();
    match next {
        Some((delay, reply)) => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            reply
        }
        None => Ok(T::default()),
    }
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn next_reply(&self, reply: Result<NextSequenceResponse, GatewayError>) {
        push(&self.next, Duration::ZERO, reply);
    }

    pub fn stats_reply(&self, reply: Result<StatsResponse, GatewayError>) {
        push(&self.stats, Duration::ZERO, reply);
    }

    pub fn stats_reply_after(&self, delay: Duration, reply: Result<StatsResponse, GatewayError>) {
        push(&self.stats, delay, reply);
    }

    pub fn health_reply(&self, reply: Result<HealthResponse, GatewayError>) {
        push(&self.health, Duration::ZERO, reply);
    }

    pub fn release_reply(&self, reply: Result<ReleaseResponse, GatewayError>) {
        push(&self.release, Duration::ZERO, reply);
    }

    pub fn reset_reply(&self, reply: Result<ResetResponse, GatewayError>) {
        push(&self.reset, Duration::ZERO, reply);
    }

    pub fn demo_reply(&self, reply: Result<DemoResponse, GatewayError>) {
        push(&self.demo, Duration::ZERO, reply);
    }

    pub fn calls(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    pub fn releases(&self) -> Vec<ReleaseRequest> {
        self.releases.lock().unwrap().clone()
    }

    fn record(&self, operation: Operation) {
        self.calls.lock().unwrap().push(operation);
    }
}

#[async_trait]
impl SequenceApi for FakeGateway {
    async fn next_sequence(
        &self,
        _site_id: &str,
        _partition_id: &str,
        _invoice_type: &str,
    ) -> Result<NextSequenceResponse, GatewayError> {
        self.record(Operation::NextSequence);
        reply(&self.next).await
    }

    async fn stats(&self) -> Result<StatsResponse, GatewayError> {
        self.record(Operation::Stats);
        reply(&self.stats).await
    }

    async fn health(&self) -> Result<HealthResponse, GatewayError> {
        self.record(Operation::Health);
        reply(&self.health).await
    }

    async fn release(&self, request: &ReleaseRequest) -> Result<ReleaseResponse, GatewayError> {
        self.record(Operation::Release);
        self.releases.lock().unwrap().push(request.clone());
        reply(&self.release).await
    }

    async fn reset(&self) -> Result<ResetResponse, GatewayError> {
        self.record(Operation::Reset);
        reply(&self.reset).await
    }

    async fn run_demo(&self, _demo_type: &str) -> Result<DemoResponse, GatewayError> {
        self.record(Operation::Demo);
        reply(&self.demo).await
    }
}

pub(crate) fn session_with(gateway: &Arc<FakeGateway>, config: &Config) -> DashboardSession {
    DashboardSession::new(gateway.clone(), config)
}

/// Let spawned tasks run to their next suspension point.
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
