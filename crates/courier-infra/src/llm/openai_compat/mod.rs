//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves Cerebras and the two
//! OpenRouter upstreams from one codebase via configurable base URLs and
//! factory functions.
//!
//! Uses [`async_openai`] for type-safe request/response handling and
//! built-in SSE streaming.

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use courier_core::provider::adapter::{FragmentStream, ProviderAdapter};
use courier_types::chat::MessageRole;
use courier_types::error::ProviderError;
use courier_types::llm::GenerationRequest;

use self::config::OpenAiCompatConfig;

/// Unified provider for any OpenAI-compatible API.
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    max_completion_tokens: Option<u32>,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
            max_completion_tokens: config.max_completion_tokens,
        }
    }

    /// Create a Cerebras provider.
    ///
    /// Uses `https://api.cerebras.ai/v1` as the base URL.
    pub fn cerebras(api_key: SecretString) -> Self {
        Self::new(config::cerebras_defaults(api_key))
    }

    /// Create a Nemotron provider routed through OpenRouter.
    pub fn nemotron(api_key: SecretString) -> Self {
        Self::new(config::nemotron_defaults(api_key))
    }

    /// Create a Qwen3-coder provider routed through OpenRouter.
    pub fn qwen3(api_key: SecretString) -> Self {
        Self::new(config::qwen3_defaults(api_key))
    }

    /// Build a [`CreateChatCompletionRequest`] from a [`GenerationRequest`].
    fn build_request(&self, request: &GenerationRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                        name: None,
                    })
                }
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            };
            messages.push(oai_msg);
        }

        let max_tokens = self
            .max_completion_tokens
            .unwrap_or(request.params.max_tokens);

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(max_tokens),
            temperature: Some(request.params.temperature as f32),
            top_p: Some(request.params.top_p as f32),
            stream: Some(true),
            ..Default::default()
        }
    }
}

impl ProviderAdapter for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn generate(&self, request: GenerationRequest) -> FragmentStream {
        let oai_request = self.build_request(&request);

        // Clone the client for the 'static stream closure
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            let mut oai_stream = client
                .chat()
                .create_stream(oai_request)
                .await
                .map_err(map_openai_error)?;

            while let Some(result) = oai_stream.next().await {
                let chunk = result.map_err(map_openai_error)?;
                if let Some(choice) = chunk.choices.first()
                    && let Some(ref text) = choice.delta.content
                {
                    yield text.clone();
                }
            }
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`ProviderError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> ProviderError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            // Check for known error types by code or type field
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                ProviderError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                ProviderError::RateLimited
            } else if code == "server_error" || error_type == "overloaded_error" {
                ProviderError::Overloaded(api_err.message.clone())
            } else {
                ProviderError::Request {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => ProviderError::AuthenticationFailed,
                    429 => ProviderError::RateLimited,
                    529 => ProviderError::Overloaded(err.to_string()),
                    _ => ProviderError::Request {
                        message: err.to_string(),
                    },
                }
            } else {
                ProviderError::Request {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            ProviderError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::StreamError(stream_err) => ProviderError::Stream(stream_err.to_string()),
        _ => ProviderError::Request {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_types::chat::ChatMessage;
    use courier_types::llm::GenerationParams;

    #[test]
    fn test_cerebras_factory() {
        let provider = OpenAiCompatibleProvider::cerebras(SecretString::from("test-key"));
        assert_eq!(provider.name(), "cerebras");
        assert_eq!(provider.model, "llama-4-scout-17b-16e-instruct");
        assert_eq!(provider.max_completion_tokens, Some(40_960));
    }

    #[test]
    fn test_nemotron_factory() {
        let provider = OpenAiCompatibleProvider::nemotron(SecretString::from("test-key"));
        assert_eq!(provider.name(), "nemotron");
        assert_eq!(provider.model, "nvidia/nemotron-3-nano-30b-a3b:free");
        assert_eq!(provider.max_completion_tokens, None);
    }

    #[test]
    fn test_qwen3_factory() {
        let provider = OpenAiCompatibleProvider::qwen3(SecretString::from("test-key"));
        assert_eq!(provider.name(), "qwen3");
        assert_eq!(provider.model, "qwen/qwen3-coder:free");
        assert_eq!(provider.max_completion_tokens, None);
    }

    #[test]
    fn test_build_request_maps_roles_and_params() {
        let provider = OpenAiCompatibleProvider::cerebras(SecretString::from("test-key"));
        let request = GenerationRequest {
            messages: vec![
                ChatMessage::new(MessageRole::System, "be brief"),
                ChatMessage::new(MessageRole::User, "hi"),
                ChatMessage::new(MessageRole::Assistant, "hello"),
            ],
            params: GenerationParams::default(),
        };

        let oai = provider.build_request(&request);
        assert_eq!(oai.model, "llama-4-scout-17b-16e-instruct");
        assert_eq!(oai.messages.len(), 3);
        assert_eq!(oai.temperature, Some(0.6));
        assert_eq!(oai.top_p, Some(1.0));
        assert_eq!(oai.stream, Some(true));
        // Cerebras carries its own completion ceiling.
        assert_eq!(oai.max_completion_tokens, Some(40_960));
    }

    #[test]
    fn test_build_request_uses_request_tokens_without_override() {
        let provider = OpenAiCompatibleProvider::nemotron(SecretString::from("test-key"));
        let request = GenerationRequest {
            messages: vec![ChatMessage::new(MessageRole::User, "hi")],
            params: GenerationParams {
                max_tokens: 8_192,
                ..GenerationParams::default()
            },
        };

        let oai = provider.build_request(&request);
        assert_eq!(oai.max_completion_tokens, Some(8_192));
    }
}
