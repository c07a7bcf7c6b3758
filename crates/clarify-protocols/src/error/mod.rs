//! Error types for the Clarify protocol layer.

mod provider;
mod credential;

pub use provider::*;
pub use credential::*;
