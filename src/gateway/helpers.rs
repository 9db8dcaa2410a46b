use serde_json::Value;

use super::{GatewayError, Operation};

/// Reject blank identifiers before anything goes on the wire.
pub fn require_identifier(
    operation: Operation,
    field: &'static str,
    value: &str,
) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::Validation { operation, field });
    }
    Ok(())
}

/// Values spliced into a URL path must stay one segment: `/` and `.` could
/// otherwise walk the request onto another endpoint.
pub fn require_path_segment(
    operation: Operation,
    field: &'static str,
    value: &str,
) -> Result<(), GatewayError> {
    require_identifier(operation, field, value)?;
    let valid = value
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(GatewayError::InvalidSegment {
            operation,
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pull a human-readable reason out of an error body (`error`, then `message`).
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
