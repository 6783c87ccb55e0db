use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::http_client::HttpClientTrait;
use crate::domain::{InvocationError, Invoker, LlmRequest, LlmResponse};

/// Invoker for OpenAI-compatible `/chat/completions` endpoints
///
/// Serves both tiers: the primary router and the secondary inference
/// providers only differ in base URL and in how the model is addressed.
pub struct ChatCompletionsInvoker<C: HttpClientTrait> {
    client: C,
    provider_name: String,
    auth_header: String,
    url: String,
    model: String,
    temperature: f64,
}

impl<C: HttpClientTrait> ChatCompletionsInvoker<C> {
    pub fn new(
        client: C,
        provider_name: impl Into<String>,
        base_url: &str,
        api_key: &str,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            provider_name: provider_name.into(),
            auth_header: format!("Bearer {}", api_key),
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    /// Request body for the wire
    ///
    /// Prompts become a single user message, arrays are taken as the
    /// message list and objects are merged over the defaults. The model
    /// is always the one this invoker is bound to.
    fn build_body(&self, request: &LlmRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.model));
        body.insert("temperature".to_string(), json!(self.temperature));

        match request {
            LlmRequest::Prompt(text) => {
                body.insert("messages".to_string(), user_message(json!(text)));
            }
            LlmRequest::Payload(Value::String(text)) => {
                body.insert("messages".to_string(), user_message(json!(text)));
            }
            LlmRequest::Payload(Value::Array(messages)) => {
                body.insert("messages".to_string(), Value::Array(messages.clone()));
            }
            LlmRequest::Payload(Value::Object(fields)) => {
                for (key, value) in fields {
                    if key != "model" {
                        body.insert(key.clone(), value.clone());
                    }
                }
            }
            LlmRequest::Payload(other) => {
                body.insert("messages".to_string(), user_message(json!(other.to_string())));
            }
        }

        Value::Object(body)
    }

    fn parse_response(&self, json: Value) -> Result<LlmResponse, InvocationError> {
        let choice = json
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .ok_or_else(|| {
                InvocationError::transient(&self.provider_name, "No choices in response")
            })?;

        let content = choice
            .pointer("/message/content")
            .and_then(Value::as_str)
            .map(str::to_string);
        let model = json.get("model").and_then(Value::as_str).map(str::to_string);

        let mut response = LlmResponse::new(json);
        response.content = content;
        response.model = model;

        Ok(response)
    }
}

fn user_message(content: Value) -> Value {
    json!([{ "role": "user", "content": content }])
}

impl<C: HttpClientTrait> std::fmt::Debug for ChatCompletionsInvoker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsInvoker")
            .field("provider_name", &self.provider_name)
            .field("url", &self.url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl<C: HttpClientTrait> Invoker for ChatCompletionsInvoker<C> {
    async fn invoke(&self, request: &LlmRequest) -> Result<LlmResponse, InvocationError> {
        let body = self.build_body(request);

        let response = self
            .client
            .post_json(&self.url, self.headers(), &body)
            .await
            .map_err(|e| e.with_provider(&self.provider_name))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &str {
        &self.provider_name
    }
}
