//! LLM provider factory.
//!
//! Builds a client from a provider name plus the endpoint, key and timeout
//! resolved from `AppConfig`.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, MockClient, OllamaClient};
use crate::types::ProviderType;
use recap_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "gemini", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key, required by Gemini
/// * `timeout` - Optional request timeout (Ollama only)
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required key
/// is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    tracing::debug!(provider = provider_type.as_str(), ?endpoint, "Creating LLM client");

    match provider_type {
        ProviderType::Ollama => {
            let mut client = OllamaClient::with_base_url(endpoint.unwrap_or("http://localhost:11434"));
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout);
            }
            Ok(Arc::new(client))
        }
        ProviderType::Gemini => {
            let key = api_key.ok_or_else(|| {
                AppError::Config("Gemini provider requires API key".to_string())
            })?;
            let client = match endpoint {
                Some(url) => GeminiClient::with_base_url(url, key),
                None => GeminiClient::new(key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Mock => Ok(Arc::new(MockClient::new())),
    }
}
