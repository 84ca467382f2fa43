//! Error taxonomy for the Courier relay.
//!
//! The split follows the failure policy of the orchestration core:
//! validation and session errors are fatal before any side effect, store
//! errors are always degraded (logged, never propagated out of a run), and
//! provider errors are fatal only before the first fragment is produced.

use thiserror::Error;

/// Malformed request shape, rejected before any core logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("messages array cannot be empty")]
    EmptyMessages,

    #[error("cannot send more than {max} messages at once")]
    TooManyMessages { max: usize },

    #[error("invalid message role: '{0}'")]
    UnknownRole(String),

    #[error("message content must not exceed {max} characters")]
    ContentTooLong { max: usize },
}

/// Invalid or missing session identifier, rejected before any side effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session_id must be a non-empty string")]
    Missing,

    #[error("session_id must be at least {min} characters")]
    TooShort { min: usize },

    #[error("session_id must not exceed {max} characters")]
    TooLong { max: usize },

    #[error("session_id can only contain alphanumeric characters, hyphens, and underscores")]
    InvalidCharacters,
}

/// Failure in the session history store.
///
/// Never fatal inside the orchestrator; every occurrence is logged and the
/// run degrades (empty history, skipped persistence).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Failure from a text-generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {message}")]
    Request { message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Fatal outcome of an orchestration run.
///
/// Everything else the orchestrator encounters is degraded in place; only
/// a missing provider or a provider that fails before producing output
/// aborts the exchange.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no provider available")]
    NoProvider,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::TooManyMessages { max: 50 };
        assert_eq!(err.to_string(), "cannot send more than 50 messages at once");
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::TooShort { min: 8 };
        assert!(err.to_string().contains('8'));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_relay_error_from_provider() {
        let err: RelayError = ProviderError::RateLimited.into();
        assert!(matches!(err, RelayError::Provider(ProviderError::RateLimited)));
    }
}
