//! Request validation for the chat endpoint.
//!
//! Validation runs before any side effect: nothing is persisted and no
//! provider is contacted for a request that fails here. Each failure kind
//! maps to its own error variant so the response names what was wrong.

use courier_types::chat::{ChatMessage, MessageRole};
use courier_types::config::RelayConfig;
use courier_types::error::{SessionError, ValidationError};

use super::handlers::chat::IncomingMessage;

/// Validate and normalize a session identifier.
///
/// Accepts `[A-Za-z0-9_-]` within the configured length bounds.
pub fn validate_session_id(
    session_id: Option<&str>,
    config: &RelayConfig,
) -> Result<String, SessionError> {
    let session_id = session_id.ok_or(SessionError::Missing)?;

    if session_id.len() < config.min_session_id_length {
        return Err(SessionError::TooShort {
            min: config.min_session_id_length,
        });
    }
    if session_id.len() > config.max_session_id_length {
        return Err(SessionError::TooLong {
            max: config.max_session_id_length,
        });
    }
    if !session_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SessionError::InvalidCharacters);
    }

    Ok(session_id.to_string())
}

/// Validate the submitted message batch and convert it to domain messages.
pub fn validate_messages(
    messages: &[IncomingMessage],
    config: &RelayConfig,
) -> Result<Vec<ChatMessage>, ValidationError> {
    if messages.is_empty() {
        return Err(ValidationError::EmptyMessages);
    }
    if messages.len() > config.max_messages_per_request {
        return Err(ValidationError::TooManyMessages {
            max: config.max_messages_per_request,
        });
    }

    messages
        .iter()
        .map(|m| {
            let role: MessageRole = m
                .role
                .parse()
                .map_err(|_| ValidationError::UnknownRole(m.role.clone()))?;
            if m.content.len() > config.max_content_length {
                return Err(ValidationError::ContentTooLong {
                    max: config.max_content_length,
                });
            }
            Ok(ChatMessage::new(role, m.content.clone()))
        })
        .collect()
}
