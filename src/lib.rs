//! PMP LLM Dispatch
//!
//! Runs LLM requests through a per-model fallback chain:
//! - Primary router credentials tried in order
//! - Secondary credentials crossed with each model's inference providers
//! - Fixed-schedule retries around every invoker
//! - Chains built once per model and shared across concurrent callers

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{ChainBuilder, ChainRegistry, DispatchError, Dispatcher};
use infrastructure::llm::{HttpClient, HttpInvokerFactory};

/// Chain builder wired to the HTTP invokers described by the configuration
pub fn create_chain_builder(config: &AppConfig) -> Result<ChainBuilder, DispatchError> {
    let dispatch = &config.dispatch;
    let chain_config = dispatch.chain_config()?;

    let client = HttpClient::with_timeout(dispatch.request_timeout())?;
    let factory = HttpInvokerFactory::new(
        client,
        dispatch.primary_endpoint(),
        dispatch.secondary_endpoint(),
    )
    .with_temperature(dispatch.temperature);

    Ok(ChainBuilder::new(Arc::new(chain_config), Arc::new(factory)))
}

pub fn create_dispatcher(config: &AppConfig) -> Result<Dispatcher, DispatchError> {
    let builder = create_chain_builder(config)?;
    let registry = ChainRegistry::new(builder);

    tracing::debug!(
        models = registry.builder().config().bindings().len(),
        "Dispatcher ready"
    );

    Ok(Dispatcher::new(Arc::new(registry)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelBindingConfig;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.dispatch.primary.credentials = vec!["sk-or-1".to_string()];
        config.dispatch.secondary.credentials = vec!["hf-1".to_string()];
        config.dispatch.models = vec![ModelBindingConfig {
            id: "m1".to_string(),
            providers: vec!["p1".to_string(), "p2".to_string()],
        }];
        config
    }

    #[test]
    fn test_create_chain_builder_plans_configured_model() {
        let builder = create_chain_builder(&config()).unwrap();
        let plan = builder.plan(&domain::ModelId::new("m1").unwrap()).unwrap();

        let labels: Vec<_> = plan.iter().map(|spec| spec.label()).collect();
        assert_eq!(labels, vec!["primary#0", "secondary#0/p1", "secondary#0/p2"]);
    }

    #[test]
    fn test_create_dispatcher_requires_credentials() {
        let result = create_dispatcher(&AppConfig::default());
        assert!(matches!(result, Err(DispatchError::Configuration { .. })));
    }
}
