use serde::Serialize;

/// Response produced by the invoker that succeeded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmResponse {
    /// Text of the first choice, when the provider returned one
    pub content: Option<String>,
    /// Model name reported by the provider
    pub model: Option<String>,
    /// Full provider response body
    pub raw: serde_json::Value,
}

impl LlmResponse {
    pub fn new(raw: serde_json::Value) -> Self {
        Self {
            content: None,
            model: None,
            raw,
        }
    }

    /// Response carrying only text, used by tests and simple invokers
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            raw: serde_json::json!({ "content": content }),
            content: Some(content),
            model: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}
