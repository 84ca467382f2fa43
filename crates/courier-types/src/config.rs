//! Relay configuration types.
//!
//! `RelayConfig` represents the top-level `config.toml` that controls
//! request limits, the history window, and default system content. All
//! fields have serde defaults so a missing or partial file still yields a
//! working configuration.

use serde::{Deserialize, Serialize};

use crate::llm::GenerationParams;

/// Top-level configuration for the Courier relay.
///
/// Loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Maximum number of messages accepted in a single request.
    #[serde(default = "default_max_messages_per_request")]
    pub max_messages_per_request: usize,

    /// Number of most-recent persisted messages fetched per exchange.
    #[serde(default = "default_history_window")]
    pub history_window: u32,

    /// Minimum accepted session_id length.
    #[serde(default = "default_min_session_id_length")]
    pub min_session_id_length: usize,

    /// Maximum accepted session_id length.
    #[serde(default = "default_max_session_id_length")]
    pub max_session_id_length: usize,

    /// Maximum accepted message content length, in characters.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Process-wide system instruction merged into every exchange.
    #[serde(default)]
    pub system_instruction: Option<String>,

    /// Process-wide context merged into every exchange.
    #[serde(default)]
    pub context: Option<String>,

    /// Sampling parameters applied to every provider call.
    #[serde(default)]
    pub generation: GenerationParams,
}

fn default_max_messages_per_request() -> usize {
    50
}

fn default_history_window() -> u32 {
    20
}

fn default_min_session_id_length() -> usize {
    8
}

fn default_max_session_id_length() -> usize {
    128
}

fn default_max_content_length() -> usize {
    50_000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_messages_per_request: default_max_messages_per_request(),
            history_window: default_history_window(),
            min_session_id_length: default_min_session_id_length(),
            max_session_id_length: default_max_session_id_length(),
            max_content_length: default_max_content_length(),
            system_instruction: None,
            context: None,
            generation: GenerationParams::default(),
        }
    }
}
