//! Transformation modes and their instructions.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const SIMPLIFY_INSTRUCTION: &str = "You are a cognitive accessibility assistant. Rewrite the following text to be simpler, clearer, and easier to understand. Use plain language (Grade 8 level). Break long sentences. Keep the meaning intact. Do not add conversational filler.";

pub const SUMMARIZE_INSTRUCTION: &str = "You are a concise summarizer. Summarize the following text into 3-5 key bullet points. Keep it factual and direct.";

/// What to do with the selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformMode {
    Simplify,
    Summarize,
    /// Local emphasis rewrite; never leaves the page.
    BionicRead,
}

impl TransformMode {
    /// Resolve a mode name. Unknown names fall back to simplify.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "simplify" => Self::Simplify,
            "summarize" => Self::Summarize,
            "bionic-read" | "bionic" => Self::BionicRead,
            other => {
                warn!(mode = other, "Unknown transformation mode, using simplify");
                Self::Simplify
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simplify => "simplify",
            Self::Summarize => "summarize",
            Self::BionicRead => "bionic-read",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::BionicRead)
    }

    /// System instruction sent with remote requests.
    pub fn instruction(&self) -> Option<&'static str> {
        match self {
            Self::Simplify => Some(SIMPLIFY_INSTRUCTION),
            Self::Summarize => Some(SUMMARIZE_INSTRUCTION),
            Self::BionicRead => None,
        }
    }
}

impl std::fmt::Display for TransformMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(TransformMode::from_name("simplify"), TransformMode::Simplify);
        assert_eq!(TransformMode::from_name("Summarize "), TransformMode::Summarize);
        assert_eq!(TransformMode::from_name("bionic-read"), TransformMode::BionicRead);
    }

    #[test]
    fn test_unknown_mode_falls_back_to_simplify() {
        let mode = TransformMode::from_name("translate");
        assert_eq!(mode, TransformMode::Simplify);
        assert_eq!(mode.instruction(), Some(SIMPLIFY_INSTRUCTION));
        assert_eq!(TransformMode::from_name(""), TransformMode::Simplify);
    }

    #[test]
    fn test_instructions() {
        assert!(TransformMode::Simplify.instruction().unwrap().contains("Grade 8"));
        assert!(TransformMode::Summarize.instruction().unwrap().contains("3-5 key bullet points"));
        assert!(TransformMode::BionicRead.instruction().is_none());
        assert!(TransformMode::BionicRead.is_local());
        assert!(!TransformMode::Summarize.is_local());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TransformMode::BionicRead).unwrap();
        assert_eq!(json, "\"bionic-read\"");
        let mode: TransformMode = serde_json::from_str("\"summarize\"").unwrap();
        assert_eq!(mode, TransformMode::Summarize);
        assert_eq!(TransformMode::Summarize.to_string(), "summarize");
    }
}
