//! Chat completion provider trait

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for chat completion providers
///
/// Implementations wrap a remote model service (OpenAI or any
/// OpenAI-compatible endpoint). Responses carry no guarantee of
/// well-formed structure; callers parse them defensively.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the model
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}
