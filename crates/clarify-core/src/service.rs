//! Transformation service backed by a chat-completions provider.

use std::sync::Arc;

use async_trait::async_trait;
use clarify_config::ProviderSettings;
use clarify_protocols::{
    ChatMessage, CompletionRequest, LLMProvider, ProviderError, QuestionRequest,
    TransformRequest, TransformService,
};
use tracing::{debug, info};

/// Context used when the page has no visible text.
pub const EMPTY_CONTEXT: &str = "No page context available";

/// Build the single user prompt for a page question.
pub fn question_prompt(question: &str, context: &str) -> String {
    format!("Context from webpage: {context}\n\nQuestion: {question}\n\nAnswer concisely:")
}

pub struct LlmTransformService {
    provider: Arc<dyn LLMProvider>,
    settings: ProviderSettings,
}

impl LlmTransformService {
    pub fn new(provider: Arc<dyn LLMProvider>, settings: ProviderSettings) -> Self {
        Self { provider, settings }
    }

    fn request(&self, messages: Vec<ChatMessage>, temperature: f32) -> CompletionRequest {
        CompletionRequest::new(&self.settings.model, messages)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(temperature)
            .with_timeout(self.settings.timeout_seconds)
    }
}

#[async_trait]
impl TransformService for LlmTransformService {
    async fn transform(&self, request: TransformRequest) -> Result<String, ProviderError> {
        let completion = self.request(
            vec![
                ChatMessage::system(request.instruction),
                ChatMessage::user(request.text),
            ],
            self.settings.temperature,
        );
        debug!(provider = self.provider.id(), model = %completion.model, "Sending transformation request");
        let response = self.provider.complete(completion).await?;
        info!(provider = self.provider.id(), chars = response.content.len(), "Transformation completed");
        Ok(response.content)
    }

    async fn answer(&self, request: QuestionRequest) -> Result<String, ProviderError> {
        let context = if request.context.trim().is_empty() {
            EMPTY_CONTEXT
        } else {
            request.context.as_str()
        };
        let completion = self.request(
            vec![ChatMessage::user(question_prompt(&request.question, context))],
            self.settings.qa_temperature,
        );
        debug!(provider = self.provider.id(), "Sending page question");
        let response = self.provider.complete(completion).await?;
        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
