//! Completion response types.

use serde::{Deserialize, Serialize};

/// Response from a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Unique ID for this completion.
    pub id: String,

    /// Model used.
    pub model: String,

    /// The assistant's text.
    pub content: String,

    /// Token usage, when the service reports it.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Usage information for a completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
