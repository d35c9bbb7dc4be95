// LLM provider support
//
// This module provides the abstraction the completion delegate talks to,
// so the hosted API can be swapped or mocked without touching the router.

use anyhow::Result;
use async_trait::async_trait;

pub mod types;

// Provider implementations
pub mod openai;

// Provider factory
pub mod factory;

// Re-export commonly used types
pub use factory::create_provider;
pub use openai::OpenAIProvider;
pub use types::{ProviderRequest, ProviderResponse};

/// Trait for LLM providers
///
/// Streaming and tool calling are not part of this interface; every call
/// waits for the full completion.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a message and get a complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
