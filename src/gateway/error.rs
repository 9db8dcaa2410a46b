use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// The remote operation a gateway call was attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    NextSequence,
    Stats,
    Health,
    Release,
    Reset,
    Demo,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::NextSequence => "fetch-next-sequence",
            Operation::Stats => "fetch-stats",
            Operation::Health => "fetch-health",
            Operation::Release => "release-sequence",
            Operation::Reset => "reset-system",
            Operation::Demo => "run-demo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse failure class; callers treat `Transport` and `Application` alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Application,
    Validation,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{operation} failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} returned {status}{}", detail_suffix(.detail))]
    Status {
        operation: Operation,
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("{operation} rejected: {message}")]
    Application {
        operation: Operation,
        message: String,
    },

    #[error("{operation} requires a non-empty {field}")]
    Validation {
        operation: Operation,
        field: &'static str,
    },

    #[error("{operation} rejected {field} '{value}': not a single path segment")]
    InvalidSegment {
        operation: Operation,
        field: &'static str,
        value: String,
    },
}

impl GatewayError {
    pub fn application(operation: Operation, message: impl Into<String>) -> Self {
        GatewayError::Application {
            operation,
            message: message.into(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            GatewayError::Transport { operation, .. }
            | GatewayError::Status { operation, .. }
            | GatewayError::Application { operation, .. }
            | GatewayError::Validation { operation, .. }
            | GatewayError::InvalidSegment { operation, .. } => *operation,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::Transport { .. } | GatewayError::Status { .. } => FailureKind::Transport,
            GatewayError::Application { .. } => FailureKind::Application,
            GatewayError::Validation { .. } | GatewayError::InvalidSegment { .. } => {
                FailureKind::Validation
            }
        }
    }

    /// Operator-facing text without the operation prefix.
    pub fn reason(&self) -> String {
        match self {
            GatewayError::Transport { source, .. } => {
                if source.is_timeout() {
                    "request timed out".to_string()
                } else if source.is_connect() {
                    "service unreachable".to_string()
                } else if source.is_decode() {
                    "unexpected response body".to_string()
                } else {
                    source.to_string()
                }
            }
            GatewayError::Status { status, detail, .. } => match detail {
                Some(detail) => detail.clone(),
                None => format!("request failed with status {}", status.as_u16()),
            },
            GatewayError::Application { message, .. } => message.clone(),
            GatewayError::Validation { field, .. } => format!("{field} must not be empty"),
            GatewayError::InvalidSegment { field, value, .. } => {
                format!("{field} '{value}' may only contain letters, digits, '-' and '_'")
            }
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}
