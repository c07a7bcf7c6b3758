//! Clipboard protocol.

/// Copy target for generated text. Writing is a side effect that always
/// succeeds from the caller's point of view.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str);
}
