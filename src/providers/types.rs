// Provider-agnostic request/response types

use crate::conversation::Message;
use serde::Serialize;

/// Unified request format for all LLM providers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    /// Conversation messages, system prompt first
    pub messages: Vec<Message>,

    /// Model name (empty means the provider default)
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    /// Create a new request from messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: String::new(),
            max_tokens: 1024,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Unified response format from LLM providers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderResponse {
    /// Response ID (provider-specific)
    pub id: String,

    /// Model that generated the response
    pub model: String,

    /// Generated text
    pub content: String,

    /// Why the model stopped generating
    pub stop_reason: Option<String>,

    /// Provider name (e.g., "openai")
    pub provider: String,
}

impl ProviderResponse {
    pub fn text(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::new(vec![Message::user("hi")])
            .with_model("gpt-3.5-turbo")
            .with_max_tokens(256)
            .with_temperature(0.0);

        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.messages.len(), 1);
    }
}
