//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use courier_types::error::{RelayError, SessionError, ValidationError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Message payload validation failure.
    Validation(ValidationError),
    /// Session identifier validation failure.
    Session(SessionError),
    /// Exchange-level failure from the orchestrator.
    Relay(RelayError),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(e) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Session(e) => (StatusCode::BAD_REQUEST, "SESSION_ERROR", e.to_string()),
            AppError::Relay(RelayError::NoProvider) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NO_PROVIDER_AVAILABLE",
                "No LLM provider is configured".to_string(),
            ),
            AppError::Relay(RelayError::Provider(e)) => {
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", e.to_string())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_types::error::ProviderError;

    #[test]
    fn validation_maps_to_400() {
        let resp = AppError::Validation(ValidationError::EmptyMessages).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn session_maps_to_400() {
        let resp = AppError::Session(SessionError::Missing).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_provider_maps_to_503() {
        let resp = AppError::Relay(RelayError::NoProvider).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn provider_failure_maps_to_502() {
        let resp =
            AppError::Relay(RelayError::Provider(ProviderError::RateLimited)).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
