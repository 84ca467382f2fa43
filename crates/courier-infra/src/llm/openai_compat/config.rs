//! Configuration types and per-provider defaults for OpenAI-compatible providers.
//!
//! Each upstream that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the correct
//! base URL, model, and output ceiling.

use secrecy::SecretString;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "cerebras", "nemotron").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.cerebras.ai/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier.
    pub model: String,
    /// Per-provider override for `max_completion_tokens`. When `None` the
    /// request's generation params decide.
    pub max_completion_tokens: Option<u32>,
}

/// Cerebras default configuration.
///
/// Base URL: `https://api.cerebras.ai/v1`
pub fn cerebras_defaults(api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "cerebras".into(),
        base_url: "https://api.cerebras.ai/v1".into(),
        api_key,
        model: "llama-4-scout-17b-16e-instruct".into(),
        max_completion_tokens: Some(40_960),
    }
}

/// Nemotron-on-OpenRouter default configuration.
///
/// Base URL: `https://openrouter.ai/api/v1`
pub fn nemotron_defaults(api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "nemotron".into(),
        base_url: "https://openrouter.ai/api/v1".into(),
        api_key,
        model: "nvidia/nemotron-3-nano-30b-a3b:free".into(),
        max_completion_tokens: None,
    }
}

/// Qwen3-coder-on-OpenRouter default configuration.
///
/// Base URL: `https://openrouter.ai/api/v1`
pub fn qwen3_defaults(api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "qwen3".into(),
        base_url: "https://openrouter.ai/api/v1".into(),
        api_key,
        model: "qwen/qwen3-coder:free".into(),
        max_completion_tokens: None,
    }
}
