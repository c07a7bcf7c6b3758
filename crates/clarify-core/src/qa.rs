//! Questions about the current page.

use std::sync::Arc;

use clarify_dom::Document;
use clarify_protocols::{CredentialStore, ProviderError, QuestionRequest, TransformService};
use tracing::{info, warn};

use crate::ui::render_error;

/// Shown when the question or the key is missing.
pub const INCOMPLETE_QUESTION: &str = "Please enter a question and API key.";

pub struct PageAssistant {
    service: Arc<dyn TransformService>,
    credentials: Arc<dyn CredentialStore>,
}

impl PageAssistant {
    pub fn new(service: Arc<dyn TransformService>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { service, credentials }
    }

    /// Answer `question` using the page's visible text as context.
    ///
    /// Always yields display text: the answer, a prompt to fill in missing
    /// input, or a rendered error.
    pub async fn ask(&self, doc: &Document, question: &str) -> String {
        let question = question.trim();
        if question.is_empty() || self.credentials.api_key().is_none() {
            return INCOMPLETE_QUESTION.to_string();
        }

        let context = doc.visible_text();
        info!(context_chars = context.chars().count(), "Asking about page");
        match self
            .service
            .answer(QuestionRequest {
                question: question.to_string(),
                context,
            })
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Page question failed");
                render_error(&question_error(&e))
            }
        }
    }
}

/// Service rejections carry their HTTP status on the question surface.
fn question_error(e: &ProviderError) -> String {
    match e {
        ProviderError::ApiError { status, .. } => {
            format!("Groq API Error {status}: {}", e.user_message())
        }
        _ => e.user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clarify_protocols::TransformRequest;
    use parking_lot::Mutex;

    use crate::credentials::MemoryCredentialStore;

    struct ScriptedService {
        reply: Result<String, ProviderError>,
        questions: Mutex<Vec<QuestionRequest>>,
    }

    impl ScriptedService {
        fn new(reply: Result<String, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                questions: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TransformService for ScriptedService {
        async fn transform(&self, _request: TransformRequest) -> Result<String, ProviderError> {
            unreachable!("page questions never transform")
        }

        async fn answer(&self, request: QuestionRequest) -> Result<String, ProviderError> {
            self.questions.lock().push(request);
            self.reply.clone()
        }
    }

    fn page() -> Document {
        Document::parse("<head><title>T</title></head><body><p>Rust was first released in 2015.</p><script>x()</script></body>")
    }

    #[tokio::test]
    async fn test_answer_uses_visible_text() {
        let service = ScriptedService::new(Ok("2015.".to_string()));
        let assistant = PageAssistant::new(service.clone(), Arc::new(MemoryCredentialStore::with_key("k")));

        let answer = assistant.ask(&page(), " When was Rust released? ").await;
        assert_eq!(answer, "2015.");

        let questions = service.questions.lock();
        assert_eq!(questions[0].question, "When was Rust released?");
        assert_eq!(questions[0].context, "Rust was first released in 2015.");
    }

    #[tokio::test]
    async fn test_missing_input() {
        let service = ScriptedService::new(Ok("unused".to_string()));
        let without_key = PageAssistant::new(service.clone(), Arc::new(MemoryCredentialStore::new()));
        assert_eq!(without_key.ask(&page(), "Question?").await, INCOMPLETE_QUESTION);

        let with_key = PageAssistant::new(service.clone(), Arc::new(MemoryCredentialStore::with_key("k")));
        assert_eq!(with_key.ask(&page(), "   ").await, INCOMPLETE_QUESTION);
        assert!(service.questions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_error_is_rendered() {
        let service = ScriptedService::new(Err(ProviderError::ApiError {
            status: 429,
            message: "Rate limit reached".to_string(),
        }));
        let assistant = PageAssistant::new(service, Arc::new(MemoryCredentialStore::with_key("k")));
        assert_eq!(
            assistant.ask(&page(), "Q?").await,
            "Error: Groq API Error 429: Rate limit reached"
        );
    }

    #[tokio::test]
    async fn test_rejection_without_message_keeps_status() {
        let service = ScriptedService::new(Err(ProviderError::ApiError {
            status: 500,
            message: String::new(),
        }));
        let assistant = PageAssistant::new(service, Arc::new(MemoryCredentialStore::with_key("k")));
        assert_eq!(
            assistant.ask(&page(), "Q?").await,
            "Error: Groq API Error 500: API Request Failed"
        );
    }

    #[tokio::test]
    async fn test_transport_error_has_no_status() {
        let service = ScriptedService::new(Err(ProviderError::Timeout(30)));
        let assistant = PageAssistant::new(service, Arc::new(MemoryCredentialStore::with_key("k")));
        assert_eq!(
            assistant.ask(&page(), "Q?").await,
            "Error: The service did not answer within 30 seconds"
        );
    }
}
