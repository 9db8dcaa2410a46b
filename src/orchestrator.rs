//! User-triggered operations: generate, release, reset and demo runs.
//!
//! Every action isolates its own failure: the outcome is reported through a
//! notification and already-displayed state is left alone.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::events::DashboardEvent;
use crate::gateway::{
    require_identifier, require_path_segment, GatewayError, NextSequenceResponse, Operation,
    ReleaseRequest,
};
use crate::notifications::NotificationLevel;
use crate::scheduler::ScheduledTask;
use crate::session::DashboardSession;
use crate::state::{DemoTrace, LastSequence, SequenceEvent};

/// Pause before re-reading stats after a release, so the new gap is visible.
pub const RELEASE_SETTLE_DELAY: Duration = Duration::from_millis(500);
/// Pause before re-reading stats after a demo run.
pub const DEMO_SETTLE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_RELEASE_REASON: &str = "manual-release";
pub const RESET_PROMPT: &str =
    "Are you sure you want to reset the entire system? This will clear all sequence data!";

/// Asks the operator to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Declined,
    Completed,
    Failed,
}

#[derive(Clone)]
pub struct ActionOrchestrator {
    session: DashboardSession,
}

impl ActionOrchestrator {
    pub fn new(session: DashboardSession) -> Self {
        Self { session }
    }

    /// Request the next sequence number and record it locally.
    pub async fn generate(
        &self,
        site_id: &str,
        partition_id: &str,
        invoice_type: &str,
    ) -> Result<SequenceEvent, GatewayError> {
        info!(site = site_id, partition = partition_id, invoice_type, "Generating sequence");

        let result = self.request_sequence(site_id, partition_id, invoice_type).await;
        let (response, sequence_number) = match result {
            Ok(issued) => issued,
            Err(err) => {
                warn!(error = %err, "Sequence generation failed");
                self.session
                    .notify(format!("Error: {}", err.reason()), NotificationLevel::Error);
                return Err(err);
            }
        };

        let event = SequenceEvent {
            sequence_number,
            site_id: response
                .site_id
                .clone()
                .unwrap_or_else(|| site_id.to_string()),
            partition_id: response
                .partition_id
                .clone()
                .unwrap_or_else(|| partition_id.to_string()),
            invoice_type: response
                .invoice_type
                .clone()
                .unwrap_or_else(|| invoice_type.to_string()),
            gap_filled: response.gap_filled,
            timestamp: Utc::now(),
            processing_time_ms: response.processing_time_ms,
        };

        let (history, last_sequence) = self.session.with_state(|state| {
            state.history.push(event.clone());
            state.last_sequence = LastSequence::issued(&event, &response);
            (
                state.history.iter().cloned().collect::<Vec<_>>(),
                state.last_sequence.clone(),
            )
        });

        let events = self.session.events();
        events.publish(DashboardEvent::LastSequenceChanged(last_sequence));
        events.publish(DashboardEvent::HistoryChanged(history));
        self.session.publish_charts();

        info!(
            sequence = sequence_number,
            gap_filled = event.gap_filled,
            "Generated sequence"
        );
        self.session.notify(
            format!("Generated sequence {sequence_number}"),
            NotificationLevel::Success,
        );
        Ok(event)
    }

    async fn request_sequence(
        &self,
        site_id: &str,
        partition_id: &str,
        invoice_type: &str,
    ) -> Result<(NextSequenceResponse, u64), GatewayError> {
        let operation = Operation::NextSequence;
        require_identifier(operation, "siteId", site_id)?;
        require_identifier(operation, "partitionId", partition_id)?;
        require_identifier(operation, "invoiceType", invoice_type)?;

        let response = self
            .session
            .gateway()
            .next_sequence(site_id, partition_id, invoice_type)
            .await?;

        let first = response.sequence_numbers.first().copied();
        match first {
            Some(sequence_number) if response.success => Ok((response, sequence_number)),
            _ => Err(GatewayError::application(
                operation,
                response
                    .error
                    .clone()
                    .unwrap_or_else(|| "Failed to generate sequence".to_string()),
            )),
        }
    }

    /// Release a sequence number back to the gap pool. Never propagates failure.
    pub async fn release(
        &self,
        sequence_number: u64,
        site_id: &str,
        partition_id: &str,
        reason: &str,
    ) -> bool {
        info!(sequence = sequence_number, reason, "Releasing sequence");
        let request = ReleaseRequest {
            sequence_number,
            site_id: site_id.to_string(),
            partition_id: partition_id.to_string(),
            reason: reason.to_string(),
        };

        match self.request_release(&request).await {
            Ok(()) => {
                self.session.notify(
                    format!("Released sequence {sequence_number}"),
                    NotificationLevel::Warning,
                );
                let session = self.session.clone();
                ScheduledTask::after(RELEASE_SETTLE_DELAY, async move {
                    session.refresh_stats().await;
                });
                true
            }
            Err(err) => {
                warn!(sequence = sequence_number, error = %err, "Release failed");
                self.session.notify(
                    format!("Error releasing sequence: {}", err.reason()),
                    NotificationLevel::Error,
                );
                false
            }
        }
    }

    async fn request_release(&self, request: &ReleaseRequest) -> Result<(), GatewayError> {
        let operation = Operation::Release;
        require_identifier(operation, "siteId", &request.site_id)?;
        require_identifier(operation, "partitionId", &request.partition_id)?;

        let response = self.session.gateway().release(request).await?;
        if !response.success {
            return Err(GatewayError::application(
                operation,
                response
                    .error
                    .or(response.message)
                    .unwrap_or_else(|| "Failed to release sequence".to_string()),
            ));
        }
        Ok(())
    }

    /// Wipe the service's sequence data after the operator confirms.
    pub async fn reset(&self, confirm: &dyn Confirm) -> ResetOutcome {
        if !confirm.confirm(RESET_PROMPT) {
            info!("Reset declined");
            return ResetOutcome::Declined;
        }

        warn!("Resetting sequence service");
        let result = match self.session.gateway().reset().await {
            Ok(response) if response.success => Ok(()),
            Ok(response) => Err(GatewayError::application(
                Operation::Reset,
                response
                    .error
                    .or(response.message)
                    .unwrap_or_else(|| "Reset failed".to_string()),
            )),
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            warn!(error = %err, "Reset failed");
            self.session.notify(
                format!("Reset failed: {}", err.reason()),
                NotificationLevel::Error,
            );
            return ResetOutcome::Failed;
        }

        let last_sequence = self.session.with_state(|state| {
            state.history.clear();
            state.last_sequence = LastSequence::after_reset();
            state.last_sequence.clone()
        });

        let events = self.session.events();
        events.publish(DashboardEvent::HistoryChanged(Vec::new()));
        events.publish(DashboardEvent::LastSequenceChanged(last_sequence));
        self.session.publish_charts();

        let session = self.session.clone();
        tokio::spawn(async move { session.refresh_stats().await });

        self.session
            .notify("System reset successfully", NotificationLevel::Success);
        ResetOutcome::Completed
    }

    /// Run a named demo on the service and trace its steps.
    pub async fn run_demo(&self, demo_type: &str) -> Result<DemoTrace, GatewayError> {
        info!(demo = demo_type, "Running demo");
        self.show_trace(DemoTrace::running(demo_type));

        let result = match require_path_segment(Operation::Demo, "demoType", demo_type) {
            Ok(()) => self.session.gateway().run_demo(demo_type).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(response) => {
                let trace = DemoTrace::completed(demo_type, &response);
                self.show_trace(trace.clone());
                if !response.success {
                    self.session.notify(
                        format!("Demo {} reported failure", response.name),
                        NotificationLevel::Error,
                    );
                }

                let session = self.session.clone();
                ScheduledTask::after(DEMO_SETTLE_DELAY, async move {
                    session.refresh_stats().await;
                });
                Ok(trace)
            }
            Err(err) => {
                warn!(demo = demo_type, error = %err, "Demo failed");
                self.show_trace(DemoTrace::failed(demo_type, &err.reason()));
                self.session.notify(
                    format!("Demo {demo_type} failed: {}", err.reason()),
                    NotificationLevel::Error,
                );
                Err(err)
            }
        }
    }

    fn show_trace(&self, trace: DemoTrace) {
        self.session
            .with_state(|state| state.demo_trace = Some(trace.clone()));
        self.session
            .events()
            .publish(DashboardEvent::DemoTraceChanged(trace));
    }
}
