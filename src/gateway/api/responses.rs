use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSequenceResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub sequence_numbers: Vec<u64>,
    #[serde(default)]
    pub gap_filled: bool,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub partition_id: Option<String>,
    #[serde(default)]
    pub invoice_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub current_counter: Option<u64>,
    #[serde(default)]
    pub total_generated: Option<u64>,
    #[serde(default)]
    pub available_gaps: Option<u64>,
    #[serde(default)]
    pub average_latency_ms: Option<f64>,
    #[serde(default)]
    pub sequences_by_site_partition: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[serde(default)]
    pub healthy: bool,
    #[serde(default)]
    pub current_counter: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub steps: Vec<DemoStep>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sequences: Vec<u64>,
}

/// Outcome reported by the server for a single demo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOutcome {
    Success,
    Failure,
    Info,
}

/// A demo step is either a structured record or, from older servers, bare text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DemoStep {
    Structured {
        text: String,
        #[serde(default)]
        outcome: Option<StepOutcome>,
    },
    Plain(String),
}

impl DemoStep {
    pub fn text(&self) -> &str {
        match self {
            DemoStep::Structured { text, .. } => text,
            DemoStep::Plain(text) => text,
        }
    }

    pub fn reported_outcome(&self) -> Option<StepOutcome> {
        match self {
            DemoStep::Structured { outcome, .. } => *outcome,
            DemoStep::Plain(_) => None,
        }
    }
}
