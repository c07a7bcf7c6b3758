//! Transformation service errors.

use thiserror::Error;

/// Fallback shown when the service rejects a request without a message.
pub const GENERIC_API_FAILURE: &str = "API Request Failed";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("API key missing")]
    MissingCredential,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Text rendered inside the result surface.
    ///
    /// Service rejections surface the service's own message verbatim; every
    /// other kind surfaces its diagnostic.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential => {
                "API key missing. Add your key in settings and try again.".to_string()
            }
            Self::ApiError { message, .. } if message.trim().is_empty() => {
                GENERIC_API_FAILURE.to_string()
            }
            Self::ApiError { message, .. } => message.clone(),
            Self::Network(message) | Self::Channel(message) => message.clone(),
            Self::MalformedResponse(detail) => format!("Unexpected response from service: {}", detail),
            Self::Timeout(secs) => format!("The service did not answer within {} seconds", secs),
        }
    }
}
