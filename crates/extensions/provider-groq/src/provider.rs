//! Groq provider implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clarify_protocols::error::GENERIC_API_FAILURE;
use clarify_protocols::{
    CompletionRequest, CompletionResponse, CredentialStore, LLMProvider, ProviderError, Usage,
};
use tracing::{debug, warn};

use crate::api::{ApiMessage, ApiRequest, ApiResponse, ErrorBody};

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq LLM provider.
///
/// The key is read from the credential store on every request.
pub struct GroqProvider {
    api_url: String,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialStore>,
}

impl GroqProvider {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self::with_url(credentials, DEFAULT_API_URL.to_string())
    }

    /// Create provider with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(credentials: Arc<dyn CredentialStore>, api_url: String) -> Self {
        Self {
            api_url,
            client: reqwest::Client::new(),
            credentials,
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> ApiRequest {
        ApiRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(
        &self,
        api_key: &str,
        api_request: &ApiRequest,
        timeout_seconds: Option<u64>,
    ) -> Result<reqwest::Response, ProviderError> {
        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(api_request);
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_seconds))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let message =
                ErrorBody::message_from(&text).unwrap_or_else(|| GENERIC_API_FAILURE.to_string());
            warn!(status, message = %message, "Service rejected request");
            return Err(ProviderError::ApiError { status, message });
        }

        Ok(response)
    }
}

fn transport_error(error: reqwest::Error, timeout_seconds: Option<u64>) -> ProviderError {
    match timeout_seconds {
        Some(secs) if error.is_timeout() => ProviderError::Timeout(secs),
        _ => ProviderError::Network(error.to_string()),
    }
}

#[async_trait]
impl LLMProvider for GroqProvider {
    fn id(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let api_key = self
            .credentials
            .api_key()
            .ok_or(ProviderError::MissingCredential)?;

        let api_request = self.build_request(&request);
        debug!(url = %self.api_url, model = %api_request.model, "POST chat completion");
        let response = self
            .send_request(&api_key, &api_request, request.timeout_seconds)
            .await?;

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, request.timeout_seconds))?;
        let mut api_response: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        let content = api_response.first_content().ok_or_else(|| {
            ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
        })?;

        Ok(CompletionResponse {
            id: api_response.id,
            model: api_response.model,
            content,
            usage: api_response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
