use std::collections::BTreeMap;

use serde::Serialize;

use crate::gateway::api::{HealthResponse, StatsResponse};

/// Latest server-reported statistics. Replaced wholesale on every successful poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub current_counter: Option<u64>,
    pub total_generated: Option<u64>,
    pub available_gaps: Option<u64>,
    pub average_latency_ms: Option<f64>,
    pub sequences_by_site_partition: Option<BTreeMap<String, u64>>,
}

impl From<StatsResponse> for StatsSnapshot {
    fn from(response: StatsResponse) -> Self {
        Self {
            current_counter: response.current_counter,
            total_generated: response.total_generated,
            available_gaps: response.available_gaps,
            average_latency_ms: response.average_latency_ms,
            sequences_by_site_partition: response.sequences_by_site_partition,
        }
    }
}

/// What the health indicator shows.
///
/// `Unreachable` means the poll itself failed; `Unhealthy` means the service answered
/// and reported a problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HealthState {
    #[default]
    Unknown,
    Healthy {
        current_counter: Option<u64>,
    },
    Unhealthy {
        current_counter: Option<u64>,
    },
    Unreachable {
        reason: String,
    },
}

impl HealthState {
    pub fn from_response(response: &HealthResponse) -> Self {
        if response.healthy {
            HealthState::Healthy {
                current_counter: response.current_counter,
            }
        } else {
            HealthState::Unhealthy {
                current_counter: response.current_counter,
            }
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, HealthState::Unreachable { .. })
    }

    pub fn label(&self) -> String {
        match self {
            HealthState::Unknown => "Checking system health...".to_string(),
            HealthState::Healthy {
                current_counter: Some(counter),
            } => format!("System Healthy • {counter} sequences generated"),
            HealthState::Healthy {
                current_counter: None,
            } => "System Healthy".to_string(),
            HealthState::Unhealthy { .. } => "System Issues Detected".to_string(),
            HealthState::Unreachable { .. } => "Cannot Connect to System".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhealthy_and_unreachable_are_distinct() {
        let unhealthy = HealthState::from_response(&HealthResponse {
            healthy: false,
            current_counter: Some(4),
            status: Some("DOWN".to_string()),
        });
        let unreachable = HealthState::Unreachable {
            reason: "service unreachable".to_string(),
        };

        assert_ne!(unhealthy, unreachable);
        assert!(!unhealthy.is_unreachable());
        assert!(unreachable.is_unreachable());
        assert_eq!(unhealthy.label(), "System Issues Detected");
        assert_eq!(unreachable.label(), "Cannot Connect to System");
    }

    #[test]
    fn healthy_label_includes_counter() {
        let healthy = HealthState::from_response(&HealthResponse {
            healthy: true,
            current_counter: Some(1042),
            status: None,
        });
        assert_eq!(healthy.label(), "System Healthy • 1042 sequences generated");
    }
}
