//! Groq chat-completions provider for Clarify.
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol, so any
//! compatible endpoint works through [`GroqProvider::with_url`].

mod api;
mod provider;

pub use provider::{DEFAULT_API_URL, GroqProvider};
