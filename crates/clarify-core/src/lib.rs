//! # Clarify Core
//!
//! Everything between the host's input events and the document:
//!
//! - [`SelectionTracker`] - decides what a pointer or key event means
//! - [`UiState`] - explicit state machine for the anchor menu and result surface
//! - [`Session`] - the single active selection context
//! - [`Orchestrator`] - drives transformation requests and applies results
//! - [`LlmTransformService`] - transformation service over an [`LLMProvider`]
//! - credential stores, an in-memory clipboard and [`PageAssistant`] for
//!   page questions
//!
//! [`LLMProvider`]: clarify_protocols::LLMProvider

pub mod clipboard;
pub mod credentials;
pub mod layout;
pub mod mode;
pub mod orchestrator;
pub mod qa;
pub mod service;
pub mod session;
pub mod tracker;
pub mod ui;

pub use clipboard::MemoryClipboard;
pub use credentials::{
    EnvCredentialStore, FileCredentialStore, LayeredCredentialStore, MemoryCredentialStore,
};
pub use layout::{LayoutProvider, StaticLayout};
pub use mode::TransformMode;
pub use orchestrator::{Orchestrator, PendingRequest, ResultView, TransformResponse};
pub use qa::PageAssistant;
pub use service::LlmTransformService;
pub use session::{SelectionSnapshot, Session};
pub use tracker::{EventTarget, InputEvent, SelectionTracker, TrackerDecision};
pub use ui::{MenuKind, MenuPlacement, ResultAction, UiAction, UiState};
