//! Tests for LlmTransformService.

use super::*;
use clarify_protocols::{ChatRole, CompletionResponse};
use parking_lot::Mutex;

use crate::mode::{SIMPLIFY_INSTRUCTION, SUMMARIZE_INSTRUCTION, TransformMode};

struct RecordingProvider {
    reply: Result<String, ProviderError>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingProvider {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> CompletionRequest {
        self.requests.lock().last().cloned().unwrap()
    }
}

#[async_trait]
impl LLMProvider for RecordingProvider {
    fn id(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().push(request);
        self.reply.clone().map(|content| CompletionResponse {
            id: "resp-1".to_string(),
            model: "mock-model".to_string(),
            content,
            usage: None,
        })
    }
}

fn transform_request(mode: TransformMode, text: &str) -> TransformRequest {
    TransformRequest {
        instruction: mode.instruction().unwrap_or_default().to_string(),
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_transform_sends_instruction_and_text() {
    let provider = RecordingProvider::replying("Short text.");
    let service = LlmTransformService::new(provider.clone(), ProviderSettings::default());

    let out = service
        .transform(transform_request(TransformMode::Simplify, "A convoluted sentence."))
        .await
        .unwrap();
    assert_eq!(out, "Short text.");

    let request = provider.last_request();
    assert_eq!(request.model, "llama-3.1-8b-instant");
    assert_eq!(request.max_tokens, Some(500));
    assert_eq!(request.temperature, Some(0.3));
    assert_eq!(request.timeout_seconds, Some(30));
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, ChatRole::System);
    assert_eq!(request.messages[0].content, SIMPLIFY_INSTRUCTION);
    assert_eq!(request.messages[1].role, ChatRole::User);
    assert_eq!(request.messages[1].content, "A convoluted sentence.");
}

#[tokio::test]
async fn test_mode_dispatch_ignores_input_text() {
    let provider = RecordingProvider::replying("- point");
    let service = LlmTransformService::new(provider.clone(), ProviderSettings::default());

    for text in ["Please simplify this.", "", "summarize"] {
        service
            .transform(transform_request(TransformMode::Summarize, text))
            .await
            .unwrap();
        assert_eq!(provider.last_request().system_instruction(), Some(SUMMARIZE_INSTRUCTION));
    }

    service
        .transform(transform_request(TransformMode::from_name("unknown"), "text"))
        .await
        .unwrap();
    assert_eq!(provider.last_request().system_instruction(), Some(SIMPLIFY_INSTRUCTION));
}

#[tokio::test]
async fn test_transform_keeps_output_verbatim() {
    let provider = RecordingProvider::replying("  - one\n- two\n");
    let service = LlmTransformService::new(provider, ProviderSettings::default());
    let out = service
        .transform(transform_request(TransformMode::Summarize, "text"))
        .await
        .unwrap();
    assert_eq!(out, "  - one\n- two\n");
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let provider = RecordingProvider::failing(ProviderError::MissingCredential);
    let service = LlmTransformService::new(provider, ProviderSettings::default());
    let err = service
        .transform(transform_request(TransformMode::Simplify, "text"))
        .await
        .unwrap_err();
    assert_eq!(err, ProviderError::MissingCredential);
}

#[tokio::test]
async fn test_answer_builds_prompt_and_trims() {
    let provider = RecordingProvider::replying("\n  Paris.  \n");
    let service = LlmTransformService::new(provider.clone(), ProviderSettings::default());

    let answer = service
        .answer(QuestionRequest {
            question: "What is the capital?".to_string(),
            context: "France's capital is Paris.".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(answer, "Paris.");

    let request = provider.last_request();
    assert_eq!(request.temperature, Some(0.8));
    assert_eq!(request.max_tokens, Some(500));
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, ChatRole::User);
    assert_eq!(
        request.messages[0].content,
        "Context from webpage: France's capital is Paris.\n\nQuestion: What is the capital?\n\nAnswer concisely:"
    );
}

#[tokio::test]
async fn test_answer_without_context() {
    let provider = RecordingProvider::replying("Unknown.");
    let service = LlmTransformService::new(provider.clone(), ProviderSettings::default());
    service
        .answer(QuestionRequest {
            question: "Anything?".to_string(),
            context: "   ".to_string(),
        })
        .await
        .unwrap();
    assert!(provider.last_request().messages[0].content.starts_with("Context from webpage: No page context available"));
}

#[tokio::test]
async fn test_settings_are_honoured() {
    let provider = RecordingProvider::replying("ok");
    let settings = ProviderSettings {
        model: "other-model".to_string(),
        max_tokens: 42,
        temperature: 0.0,
        timeout_seconds: 5,
        ..ProviderSettings::default()
    };
    let service = LlmTransformService::new(provider.clone(), settings);
    service
        .transform(transform_request(TransformMode::Simplify, "text"))
        .await
        .unwrap();
    let request = provider.last_request();
    assert_eq!(request.model, "other-model");
    assert_eq!(request.max_tokens, Some(42));
    assert_eq!(request.temperature, Some(0.0));
    assert_eq!(request.timeout_seconds, Some(5));
}
