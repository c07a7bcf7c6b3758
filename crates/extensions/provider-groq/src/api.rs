//! Chat-completions wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub role: &'static str,
    pub content: String,
}

/// Successful response. Every field is optional so that a missing choice or
/// message surfaces as a malformed response rather than a parse error.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl ApiResponse {
    /// `choices[0].message.content`.
    pub fn first_content(&mut self) -> Option<String> {
        self.choices
            .first_mut()
            .and_then(|c| c.message.as_mut())
            .and_then(|m| m.content.take())
    }
}

/// Body of a rejected request.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: Option<String>,
}

impl ErrorBody {
    /// `error.message` from a response body, if it has one.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()?
            .error?
            .message
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_unset_fields() {
        let request = ApiRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![ApiMessage {
                role: "user",
                content: "Hello".to_string(),
            }],
            max_tokens: None,
            temperature: Some(0.3),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("max_tokens").is_none());
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_first_content() {
        let mut response: ApiResponse = serde_json::from_str(
            r#"{"id":"x","model":"m","choices":[{"index":0,"message":{"role":"assistant","content":"Hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_content().as_deref(), Some("Hi"));

        let mut empty: ApiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(empty.first_content().is_none());

        let mut no_message: ApiResponse = serde_json::from_str(r#"{"choices":[{"index":0}]}"#).unwrap();
        assert!(no_message.first_content().is_none());

        let mut null_content: ApiResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(null_content.first_content().is_none());
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            ErrorBody::message_from(r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#)
                .as_deref(),
            Some("Invalid API Key")
        );
        assert!(ErrorBody::message_from(r#"{"error":{"message":""}}"#).is_none());
        assert!(ErrorBody::message_from(r#"{"detail":"nope"}"#).is_none());
        assert!(ErrorBody::message_from("Internal Server Error").is_none());
    }
}
