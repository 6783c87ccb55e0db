//! Dispatcher - public entry point for running a request against a model

use std::sync::Arc;

use tracing::{info_span, Instrument};
use uuid::Uuid;

use super::chain::ChainRegistry;
use super::{DispatchError, LlmRequest, LlmResponse, ModelId};

/// Runs requests through the cached fallback chain of each model
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ChainRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    /// Run a request against a model by name
    ///
    /// Malformed or unregistered model names fail with `InvalidModel`;
    /// otherwise the chain's result is returned unchanged.
    pub async fn run(
        &self,
        model: &str,
        request: LlmRequest,
    ) -> Result<LlmResponse, DispatchError> {
        let model_id = ModelId::new(model)
            .map_err(|e| DispatchError::invalid_model(model, e.to_string()))?;

        self.run_model(&model_id, request).await
    }

    pub async fn run_model(
        &self,
        model_id: &ModelId,
        request: LlmRequest,
    ) -> Result<LlmResponse, DispatchError> {
        let span = info_span!(
            "dispatch",
            request_id = %Uuid::new_v4(),
            model = %model_id
        );

        async {
            let chain = self.registry.get_or_build(model_id).await?;
            chain.execute(&request).await
        }
        .instrument(span)
        .await
    }
}
