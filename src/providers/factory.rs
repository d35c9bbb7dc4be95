// Provider factory
//
// Creates the configured LLM provider

use anyhow::{bail, Result};

use super::openai::OpenAIProvider;
use super::LlmProvider;
use crate::config::ProviderConfig;
use crate::errors::api_key_missing_error;

/// Create a provider from configuration
///
/// Fails when no usable credential is configured.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    let api_key = match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => bail!(api_key_missing_error("OpenAI")),
    };

    let provider = OpenAIProvider::new(
        api_key,
        config.base_url.clone(),
        config.model.clone(),
        config.timeout(),
    )?;

    Ok(Box::new(provider))
}
