//! Credential store protocol.

use crate::error::CredentialError;

/// Holds the single secret used to authenticate with the transformation
/// service. Read at request time, never cached by callers.
pub trait CredentialStore: Send + Sync {
    /// Current key. Empty keys are reported as absent.
    fn api_key(&self) -> Option<String>;

    /// Replace the stored key.
    fn set_api_key(&self, key: &str) -> Result<(), CredentialError>;

    /// Remove the stored key.
    fn clear(&self) -> Result<(), CredentialError>;
}
