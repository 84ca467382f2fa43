//! ProviderAdapter trait definition.
//!
//! This is the capability every text-generation backend exposes to the
//! orchestrator: given an assembled message list, return a lazy stream of
//! text fragments. Adapters are stateless and interchangeable; they differ
//! only in name and the external system they call.

use std::pin::Pin;

use futures_util::Stream;

use courier_types::error::ProviderError;
use courier_types::llm::GenerationRequest;

/// Lazy sequence of text fragments from a provider.
///
/// A fragment is one incremental unit of generated text; the full response
/// only exists once the stream ends. Errors before the first item mean the
/// exchange never started; errors mid-stream terminate it.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>>;

/// Trait for text-generation provider backends.
///
/// The stream is boxed so the trait stays object-safe: the pool holds
/// adapters as `Arc<dyn ProviderAdapter>` for runtime rotation.
/// Implementations live in courier-infra (e.g. `OpenAiCompatibleProvider`).
pub trait ProviderAdapter: Send + Sync {
    /// Human-readable provider name (e.g. "cerebras", "nemotron").
    fn name(&self) -> &str;

    /// Open a streaming generation for the given request.
    ///
    /// Opening is lazy; a provider that cannot start yields its error as
    /// the first stream item.
    fn generate(&self, request: GenerationRequest) -> FragmentStream;
}
