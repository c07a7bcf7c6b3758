//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub selection: SelectionSettings,

    #[serde(default)]
    pub credentials: CredentialSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Transformation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Chat-completions endpoint (OpenAI-compatible).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for simplify/summarize.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Sampling temperature for page questions.
    #[serde(default = "default_qa_temperature")]
    pub qa_temperature: f32,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            qa_temperature: default_qa_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.3
}

fn default_qa_temperature() -> f32 {
    0.8
}

fn default_timeout() -> u64 {
    30
}

/// Selection tracking and menu placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSettings {
    /// Selections must be strictly longer than this many characters.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Distance between the anchor point and the menu corner.
    #[serde(default = "default_anchor_offset")]
    pub anchor_offset: f64,

    /// Minimum distance between the menu and the viewport edge.
    #[serde(default = "default_viewport_margin")]
    pub viewport_margin: f64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            anchor_offset: default_anchor_offset(),
            viewport_margin: default_viewport_margin(),
        }
    }
}

fn default_min_length() -> usize {
    10
}

fn default_anchor_offset() -> f64 {
    10.0
}

fn default_viewport_margin() -> f64 {
    10.0
}

/// Where the service credential lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSettings {
    #[serde(default = "default_credentials_path")]
    pub path: PathBuf,

    /// Environment variable consulted when the file holds no key.
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
            env_var: default_env_var(),
        }
    }
}

fn default_credentials_path() -> PathBuf {
    clarify_dir().join("credentials.json")
}

fn default_env_var() -> String {
    "GROQ_API_KEY".to_string()
}

/// Result surface behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// How long the copy button reads "Copied!".
    #[serde(default = "default_copied_label_ms")]
    pub copied_label_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            copied_label_ms: default_copied_label_ms(),
        }
    }
}

fn default_copied_label_ms() -> u64 {
    2000
}

/// The `~/.clarify` directory.
pub fn clarify_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".clarify"))
        .unwrap_or_else(|| PathBuf::from(".clarify"))
}
