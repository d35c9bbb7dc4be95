// Conversational completion over a provider

use anyhow::Result;
use std::sync::Arc;

use super::Knowledge;
use crate::config::ProviderConfig;
use crate::conversation::Message;
use crate::providers::{create_provider, LlmProvider, ProviderRequest};

/// Opaque `(history, input) -> text` function backed by an LLM provider
#[derive(Clone)]
pub struct CompletionDelegate {
    provider: Arc<dyn LlmProvider>,
    knowledge: Knowledge,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionDelegate {
    pub fn new(provider: Arc<dyn LlmProvider>, knowledge: Knowledge) -> Self {
        let defaults = ProviderConfig::default();
        Self {
            model: provider.default_model().to_string(),
            provider,
            knowledge,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the provider from configuration
    ///
    /// Called once at startup; the outcome is handed to the router.
    pub fn initialize(config: &ProviderConfig, knowledge: Knowledge) -> DelegateStatus {
        match create_provider(config) {
            Ok(provider) => {
                tracing::info!(
                    provider = provider.name(),
                    model = %config.model,
                    "Completion delegate ready"
                );
                let delegate = Self::new(Arc::from(provider), knowledge)
                    .with_model(config.model.clone())
                    .with_temperature(config.temperature)
                    .with_max_tokens(config.max_tokens);
                DelegateStatus::Ready(delegate)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Completion delegate unavailable");
                DelegateStatus::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion for `input` given prior turns
    pub async fn complete(&self, history: &[Message], input: &str) -> Result<String> {
        let request = ProviderRequest::new(self.knowledge.build_messages(history, input))
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.provider.send_message(&request).await?;
        Ok(response.content)
    }
}

/// Outcome of delegate construction at startup
#[derive(Clone)]
pub enum DelegateStatus {
    Ready(CompletionDelegate),
    Unavailable { reason: String },
}

impl DelegateStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, DelegateStatus::Ready(_))
    }

    pub fn delegate(&self) -> Option<&CompletionDelegate> {
        match self {
            DelegateStatus::Ready(delegate) => Some(delegate),
            DelegateStatus::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for DelegateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelegateStatus::Ready(delegate) => f
                .debug_tuple("Ready")
                .field(&delegate.provider_name())
                .finish(),
            DelegateStatus::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}
