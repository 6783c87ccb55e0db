//! Chain builder - expands a model into its ordered invoker specs

use std::sync::Arc;

use tracing::debug;

use super::{ChainConfig, FallbackChain};
use crate::domain::retry::RetryingInvoker;
use crate::domain::{DispatchError, InvokerFactory, InvokerSpec, ModelId};

/// Plans and builds fallback chains from a ChainConfig
#[derive(Clone)]
pub struct ChainBuilder {
    config: Arc<ChainConfig>,
    factory: Arc<dyn InvokerFactory>,
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("models", &self.config.bindings().len())
            .finish()
    }
}

impl ChainBuilder {
    pub fn new(config: Arc<ChainConfig>, factory: Arc<dyn InvokerFactory>) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Ordered invoker specs for a model, without building anything
    ///
    /// Primary credentials come first in list order, then every secondary
    /// credential expanded over the model's provider names.
    pub fn plan(&self, model_id: &ModelId) -> Result<Vec<InvokerSpec>, DispatchError> {
        let providers = self
            .config
            .bindings()
            .providers_for(model_id)
            .ok_or_else(|| DispatchError::invalid_model(model_id.as_str(), "Model not supported"))?;

        let mut specs = Vec::with_capacity(self.config.invoker_count(model_id).unwrap_or(0));

        for credential in self.config.primary_credentials() {
            specs.push(InvokerSpec::new(
                credential.clone(),
                model_id.clone(),
                specs.len(),
            ));
        }

        for credential in self.config.secondary_credentials() {
            for provider in providers {
                specs.push(
                    InvokerSpec::new(credential.clone(), model_id.clone(), specs.len())
                        .with_provider(provider.as_str()),
                );
            }
        }

        if specs.is_empty() {
            return Err(DispatchError::empty_chain(model_id.as_str()));
        }

        Ok(specs)
    }

    /// Build the chain, calling the factory once per planned spec
    pub fn build(&self, model_id: &ModelId) -> Result<FallbackChain, DispatchError> {
        let specs = self.plan(model_id)?;
        let mut elements = Vec::with_capacity(specs.len());

        for spec in specs {
            let invoker = self.factory.create(&spec)?;

            debug!(
                model = %model_id,
                invoker = %spec.label(),
                provider = invoker.provider_name(),
                "Created chain invoker"
            );

            elements.push(RetryingInvoker::new(
                spec,
                invoker,
                self.config.retry_policy().clone(),
            ));
        }

        FallbackChain::new(model_id.clone(), elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::ProviderBindings;
    use crate::domain::invoker::mock::RecordingFactory;
    use crate::domain::invoker::MockInvokerFactory;
    use crate::domain::retry::RetryPolicy;
    use crate::domain::ProviderTier;

    fn model(id: &str) -> ModelId {
        ModelId::new(id).unwrap()
    }

    fn config() -> Arc<ChainConfig> {
        let bindings = ProviderBindings::new()
            .with_model(model("m1"), ["p1", "p2"])
            .with_model(model("primary-only"), Vec::<String>::new());

        Arc::new(
            ChainConfig::new(
                ["k0", "k1"],
                ["t0", "t1"],
                bindings,
                RetryPolicy::immediate(3).unwrap(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_plan_order() {
        let builder = ChainBuilder::new(config(), Arc::new(RecordingFactory::succeeding()));

        let labels: Vec<String> = builder
            .plan(&model("m1"))
            .unwrap()
            .iter()
            .map(InvokerSpec::label)
            .collect();

        assert_eq!(
            labels,
            vec![
                "primary#0",
                "primary#1",
                "secondary#0/p1",
                "secondary#0/p2",
                "secondary#1/p1",
                "secondary#1/p2",
            ]
        );
    }

    #[test]
    fn test_plan_positions_and_tiers() {
        let builder = ChainBuilder::new(config(), Arc::new(RecordingFactory::succeeding()));
        let specs = builder.plan(&model("m1")).unwrap();

        for (index, spec) in specs.iter().enumerate() {
            assert_eq!(spec.position(), index);
            assert_eq!(spec.model_id().as_str(), "m1");
        }

        let first_secondary = specs
            .iter()
            .position(|s| s.tier() == ProviderTier::Secondary)
            .unwrap();
        assert!(specs[..first_secondary]
            .iter()
            .all(|s| s.tier() == ProviderTier::Primary && s.provider().is_none()));
        assert!(specs[first_secondary..]
            .iter()
            .all(|s| s.tier() == ProviderTier::Secondary && s.provider().is_some()));
    }

    #[test]
    fn test_primary_only_plan() {
        let builder = ChainBuilder::new(config(), Arc::new(RecordingFactory::succeeding()));
        let specs = builder.plan(&model("primary-only")).unwrap();

        assert_eq!(specs.len(), 2);
        assert!(specs.iter().all(|s| s.tier() == ProviderTier::Primary));
    }

    #[test]
    fn test_build_calls_factory_once_per_spec() {
        let factory = Arc::new(RecordingFactory::succeeding());
        let builder = ChainBuilder::new(config(), factory.clone());

        let chain = builder.build(&model("m1")).unwrap();

        assert_eq!(chain.len(), 6);
        assert_eq!(factory.creations(), 6);
        assert_eq!(factory.created_labels(), chain.labels());
    }

    #[test]
    fn test_unknown_model_never_touches_factory() {
        let mut factory = MockInvokerFactory::new();
        factory.expect_create().never();

        let builder = ChainBuilder::new(config(), Arc::new(factory));
        let result = builder.build(&model("unknown"));

        assert!(matches!(result, Err(DispatchError::InvalidModel { .. })));
    }

    #[test]
    fn test_factory_error_aborts_build() {
        let mut factory = MockInvokerFactory::new();
        factory
            .expect_create()
            .times(1)
            .returning(|_| Err(DispatchError::configuration("no transport")));

        let builder = ChainBuilder::new(config(), Arc::new(factory));
        let result = builder.build(&model("m1"));

        assert!(matches!(result, Err(DispatchError::Configuration { .. })));
    }
}
