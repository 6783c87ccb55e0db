use serde::{Deserialize, Serialize};

/// Opaque request forwarded unchanged to whichever invoker runs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LlmRequest {
    /// Plain prompt text
    Prompt(String),
    /// Structured payload (a message list or a request body fragment)
    Payload(serde_json::Value),
}

impl LlmRequest {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::Prompt(text.into())
    }

    pub fn payload(value: serde_json::Value) -> Self {
        Self::Payload(value)
    }
}

impl From<&str> for LlmRequest {
    fn from(text: &str) -> Self {
        Self::Prompt(text.to_string())
    }
}

impl From<String> for LlmRequest {
    fn from(text: String) -> Self {
        Self::Prompt(text)
    }
}

impl From<serde_json::Value> for LlmRequest {
    fn from(value: serde_json::Value) -> Self {
        Self::Payload(value)
    }
}
