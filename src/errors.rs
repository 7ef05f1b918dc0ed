//! Remote error classification
//!
//! Turns SDK failures into diagnostics. A missing entity is reported as
//! [`DiagnosticKind::NotFound`] so callers can say "no matching entity"
//! instead of surfacing a generic API failure.

use crate::buddy::ApiError;
use crate::framework::diag::{Diagnostic, DiagnosticKind};

/// Body the API returns, with HTTP 403, for a workspace that is not active
pub const INACTIVE_WORKSPACE_MESSAGE: &str = "Only active workspace have access to API";

/// Whether the error means the entity does not exist
pub fn is_not_found(err: &ApiError) -> bool {
    match err {
        ApiError::Status { status: 404, .. } => true,
        ApiError::Status { status: 403, message } => message.contains(INACTIVE_WORKSPACE_MESSAGE),
        _ => false,
    }
}

/// Diagnostic for an entity that does not exist
pub fn not_found(entity: &str) -> Diagnostic {
    tracing::warn!("{} not found", entity);
    Diagnostic::error(
        DiagnosticKind::NotFound,
        "Not found",
        format!("{} not found", entity),
    )
}

/// Classify a failed remote call made for `operation` (e.g. "get pipeline")
pub fn from_api(entity: &str, operation: &str, err: &ApiError) -> Diagnostic {
    if is_not_found(err) {
        return not_found(entity);
    }
    tracing::error!("{} failed: {}", operation, err);
    Diagnostic::error(
        DiagnosticKind::Api,
        "API error",
        format!("Unable to {}, got error: {}", operation, err),
    )
}

/// Convert SDK results into diagnostic results at the call site
pub trait ApiResultExt<T> {
    fn or_diagnostic(self, entity: &str, operation: &str) -> Result<T, Diagnostic>;
}

impl<T> ApiResultExt<T> for Result<T, ApiError> {
    fn or_diagnostic(self, entity: &str, operation: &str) -> Result<T, Diagnostic> {
        self.map_err(|err| from_api(entity, operation, &err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, message: &str) -> ApiError {
        ApiError::Status {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_404_is_not_found() {
        let diag = from_api("project", "get project", &status(404, "Project not found"));
        assert_eq!(diag.kind, DiagnosticKind::NotFound);
        assert!(diag.is_error());
    }

    #[test]
    fn test_inactive_workspace_403_is_not_found() {
        let diag = from_api("pipeline", "get pipeline", &status(403, INACTIVE_WORKSPACE_MESSAGE));
        assert_eq!(diag.kind, DiagnosticKind::NotFound);
    }

    #[test]
    fn test_other_403_is_api_error() {
        let diag = from_api("pipeline", "get pipeline", &status(403, "Forbidden"));
        assert_eq!(diag.kind, DiagnosticKind::Api);
        assert!(diag.detail.starts_with("Unable to get pipeline"));
    }

    #[test]
    fn test_result_extension() {
        let ok: Result<i64, ApiError> = Ok(3);
        assert_eq!(ok.or_diagnostic("group", "get group").unwrap(), 3);
        let err: Result<i64, ApiError> = Err(status(404, ""));
        assert_eq!(err.or_diagnostic("group", "get group").unwrap_err().detail, "group not found");
    }

    #[test]
    fn test_transport_failure_is_api_error() {
        let diag = from_api("group", "get groups", &ApiError::Transport("connection refused".into()));
        assert_eq!(diag.kind, DiagnosticKind::Api);
        assert!(diag.detail.contains("connection refused"));
    }
}
