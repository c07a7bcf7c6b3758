//! # Clarify Protocols
//!
//! Collaborator definitions (traits) shared by the Clarify crates.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`LLMProvider`] - Chat-completion backend
//! - [`TransformService`] - Text transformation and question answering
//! - [`CredentialStore`] - Holder of the service credential
//! - [`Clipboard`] - Copy target for generated text

pub mod error;
pub mod provider;
pub mod service;
pub mod credential;
pub mod clipboard;

pub use error::{CredentialError, ProviderError};
pub use provider::{ChatMessage, ChatRole, CompletionRequest, CompletionResponse, LLMProvider, Usage};
pub use service::{QuestionRequest, TransformRequest, TransformService};
pub use credential::CredentialStore;
pub use clipboard::Clipboard;
