//! RagProvider trait definition.
//!
//! The abstraction over the external RAG answering service. Uses native
//! async fn in traits (RPITIT, Rust 2024 edition). The concrete HTTP
//! client lives in ragrelay-infra.

use ragrelay_types::error::ProviderError;

/// Trait for the external RAG answering provider.
///
/// Contract: given non-empty question text and an opaque conversation
/// identifier, return the raw answer text. Implementations own the
/// provider-specific concerns (endpoint, auth key, payload shape) and
/// make at most one attempt per invocation; any failure surfaces as the
/// single [`ProviderError::Unavailable`] kind.
pub trait RagProvider: Send + Sync {
    /// Human-readable provider name (e.g., "ragflow").
    fn name(&self) -> &str;

    /// Ask the provider for an answer to `question` within the given
    /// conversation.
    fn ask(
        &self,
        question: &str,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}
