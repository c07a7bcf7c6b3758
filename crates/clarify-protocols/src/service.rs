//! Transformation service protocol.
//!
//! The service is a black box: given an instruction and input text it returns
//! transformed text or an error carrying a human-readable message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A single transformation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    /// Fixed system instruction for the selected mode.
    pub instruction: String,
    /// Text captured from the page.
    pub text: String,
}

/// A free-form question about the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    /// Visible text of the page, used as context.
    pub context: String,
}

#[async_trait]
pub trait TransformService: Send + Sync {
    /// Transform text according to the request's instruction.
    async fn transform(&self, request: TransformRequest) -> Result<String, ProviderError>;

    /// Answer a question using the page context.
    async fn answer(&self, request: QuestionRequest) -> Result<String, ProviderError>;
}
