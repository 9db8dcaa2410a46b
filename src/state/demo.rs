//! Step-by-step trace shown for a demo run.

use serde::Serialize;

use crate::gateway::api::{DemoResponse, DemoStep, StepOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStyle {
    Running,
    Success,
    Error,
    Neutral,
    Summary,
}

/// Where a step's style came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Reported,
    /// Plain-text step from a server that sends no outcome; style guessed from its text.
    Inferred,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceLine {
    pub text: String,
    pub style: TraceStyle,
    pub classification: Classification,
}

impl TraceLine {
    fn fixed(text: impl Into<String>, style: TraceStyle) -> Self {
        Self {
            text: text.into(),
            style,
            classification: Classification::Fixed,
        }
    }

    fn from_step(step: &DemoStep) -> Self {
        let text = step.text().to_string();
        match step.reported_outcome() {
            Some(outcome) => Self {
                style: match outcome {
                    StepOutcome::Success => TraceStyle::Success,
                    StepOutcome::Failure => TraceStyle::Error,
                    StepOutcome::Info => TraceStyle::Neutral,
                },
                text,
                classification: Classification::Reported,
            },
            None => Self {
                style: if legacy_step_failed(&text) {
                    TraceStyle::Error
                } else {
                    TraceStyle::Success
                },
                text,
                classification: Classification::Inferred,
            },
        }
    }
}

// Servers without per-step outcomes mark failed steps in the text itself
fn legacy_step_failed(text: &str) -> bool {
    text.contains("ERROR") || text.contains("FAILED")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemoTrace {
    pub demo_type: String,
    pub lines: Vec<TraceLine>,
}

impl DemoTrace {
    pub fn running(demo_type: &str) -> Self {
        Self {
            demo_type: demo_type.to_string(),
            lines: vec![TraceLine::fixed(
                format!("Running {demo_type} demonstration..."),
                TraceStyle::Running,
            )],
        }
    }

    pub fn completed(demo_type: &str, result: &DemoResponse) -> Self {
        let verdict = if result.success { "SUCCESS" } else { "FAILED" };
        let header_style = if result.success {
            TraceStyle::Success
        } else {
            TraceStyle::Error
        };

        let mut lines = Vec::with_capacity(result.steps.len() + 2);
        lines.push(TraceLine::fixed(
            format!("{} - {}", result.name, verdict),
            header_style,
        ));
        lines.extend(result.steps.iter().map(TraceLine::from_step));
        if let Some(summary) = result.summary.as_deref().filter(|s| !s.is_empty()) {
            lines.push(TraceLine::fixed(
                format!("Summary: {summary}"),
                TraceStyle::Summary,
            ));
        }

        Self {
            demo_type: demo_type.to_string(),
            lines,
        }
    }

    pub fn failed(demo_type: &str, reason: &str) -> Self {
        Self {
            demo_type: demo_type.to_string(),
            lines: vec![TraceLine::fixed(
                format!("Demo Failed: {reason}"),
                TraceStyle::Error,
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(steps: Vec<DemoStep>, summary: Option<&str>) -> DemoResponse {
        DemoResponse {
            name: "Gap Recovery Demo".to_string(),
            success: true,
            steps,
            summary: summary.map(str::to_string),
            sequences: Vec::new(),
        }
    }

    #[test]
    fn completed_trace_has_header_steps_and_summary() {
        let trace = DemoTrace::completed(
            "gaps",
            &response(
                vec![
                    DemoStep::Plain("Generated 5 sequences".to_string()),
                    DemoStep::Plain("Release FAILED for 3".to_string()),
                ],
                Some("1 gap recovered"),
            ),
        );

        let texts: Vec<&str> = trace.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Gap Recovery Demo - SUCCESS",
                "Generated 5 sequences",
                "Release FAILED for 3",
                "Summary: 1 gap recovered"
            ]
        );
        assert_eq!(trace.lines[1].style, TraceStyle::Success);
        assert_eq!(trace.lines[2].style, TraceStyle::Error);
        assert_eq!(trace.lines[2].classification, Classification::Inferred);
    }

    #[test]
    fn reported_outcome_wins_over_text() {
        let trace = DemoTrace::completed(
            "basic",
            &response(
                vec![DemoStep::Structured {
                    text: "Expected ERROR path exercised".to_string(),
                    outcome: Some(StepOutcome::Success),
                }],
                None,
            ),
        );

        assert_eq!(trace.lines.len(), 2);
        assert_eq!(trace.lines[1].style, TraceStyle::Success);
        assert_eq!(trace.lines[1].classification, Classification::Reported);
    }

    #[test]
    fn unsuccessful_run_gets_failed_header() {
        let mut result = response(Vec::new(), Some(""));
        result.success = false;
        let trace = DemoTrace::completed("load-test", &result);
        assert_eq!(trace.lines.len(), 1);
        assert_eq!(trace.lines[0].text, "Gap Recovery Demo - FAILED");
        assert_eq!(trace.lines[0].style, TraceStyle::Error);
    }

    #[test]
    fn failure_replaces_trace_with_single_line() {
        let trace = DemoTrace::failed("concurrent", "service unreachable");
        assert_eq!(trace.lines.len(), 1);
        assert_eq!(trace.lines[0].text, "Demo Failed: service unreachable");
    }
}
