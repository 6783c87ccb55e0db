use std::sync::Arc;

use super::chat_completions::ChatCompletionsInvoker;
use super::http_client::HttpClient;
use crate::domain::{DispatchError, Invoker, InvokerFactory, InvokerSpec, ProviderTier};

pub const DEFAULT_PRIMARY_NAME: &str = "openrouter";
pub const DEFAULT_PRIMARY_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SECONDARY_NAME: &str = "huggingface";
pub const DEFAULT_SECONDARY_BASE_URL: &str = "https://router.huggingface.co/v1";

/// Where one provider tier is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub name: String,
    pub base_url: String,
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    pub fn primary_default() -> Self {
        Self::new(DEFAULT_PRIMARY_NAME, DEFAULT_PRIMARY_BASE_URL)
    }

    pub fn secondary_default() -> Self {
        Self::new(DEFAULT_SECONDARY_NAME, DEFAULT_SECONDARY_BASE_URL)
    }
}

/// Builds chat-completions invokers for both provider tiers
///
/// Primary invokers address the model by its id; secondary invokers pin
/// the inference provider with a `model:provider` suffix.
#[derive(Debug, Clone)]
pub struct HttpInvokerFactory {
    client: HttpClient,
    primary: EndpointConfig,
    secondary: EndpointConfig,
    temperature: f64,
}

impl HttpInvokerFactory {
    pub fn new(client: HttpClient, primary: EndpointConfig, secondary: EndpointConfig) -> Self {
        Self {
            client,
            primary,
            secondary,
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn build(&self, spec: &InvokerSpec) -> Result<ChatCompletionsInvoker<HttpClient>, DispatchError> {
        let invoker = match spec.tier() {
            ProviderTier::Primary => ChatCompletionsInvoker::new(
                self.client.clone(),
                self.primary.name.as_str(),
                &self.primary.base_url,
                spec.credential().secret(),
                spec.model_id().as_str(),
            ),
            ProviderTier::Secondary => {
                let provider = spec.provider().ok_or_else(|| {
                    DispatchError::configuration(format!(
                        "Secondary invoker {} has no provider name",
                        spec.label()
                    ))
                })?;

                ChatCompletionsInvoker::new(
                    self.client.clone(),
                    format!("{}/{}", self.secondary.name, provider),
                    &self.secondary.base_url,
                    spec.credential().secret(),
                    format!("{}:{}", spec.model_id(), provider),
                )
            }
        };

        Ok(invoker.with_temperature(self.temperature))
    }
}

impl InvokerFactory for HttpInvokerFactory {
    fn create(&self, spec: &InvokerSpec) -> Result<Arc<dyn Invoker>, DispatchError> {
        Ok(Arc::new(self.build(spec)?))
    }
}
