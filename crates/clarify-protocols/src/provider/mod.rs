//! LLM Provider protocol definitions.
//!
//! Providers connect to chat-completion APIs and return the assistant text.

mod traits;
mod request;
mod response;

pub use traits::*;
pub use request::*;
pub use response::*;
