//! Generation request types for Courier.
//!
//! These types model what the relay hands to a provider adapter: the
//! assembled message list plus the sampling parameters shared by every
//! OpenAI-compatible upstream.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Sampling parameters applied to every generation request.
///
/// Defaults match the relay's process-wide generation settings
/// (temperature 0.6, 4096 output tokens, top_p 1.0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

fn default_temperature() -> f64 {
    0.6
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_top_p() -> f64 {
    1.0
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// Request handed to a provider adapter for one exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Ordered message list, oldest first, optional synthesized system
    /// message at the front.
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}
