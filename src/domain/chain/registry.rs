//! Chain registry - builds each model's chain once and caches it

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::info;

use super::{ChainBuilder, FallbackChain};
use crate::domain::{DispatchError, ModelId};

type ChainSlot = Arc<OnceCell<Arc<FallbackChain>>>;

/// Append-only cache of fallback chains keyed by model
///
/// Each model owns its own once-cell, so concurrent callers for one model
/// wait on a single build while other models build independently. A
/// failed build leaves the cell empty and is retried by the next caller.
#[derive(Debug)]
pub struct ChainRegistry {
    builder: ChainBuilder,
    chains: RwLock<HashMap<ModelId, ChainSlot>>,
}

impl ChainRegistry {
    pub fn new(builder: ChainBuilder) -> Self {
        Self {
            builder,
            chains: RwLock::new(HashMap::new()),
        }
    }

    pub fn builder(&self) -> &ChainBuilder {
        &self.builder
    }

    /// Return the cached chain for a model, building it on first use
    pub async fn get_or_build(
        &self,
        model_id: &ModelId,
    ) -> Result<Arc<FallbackChain>, DispatchError> {
        if !self.builder.config().bindings().contains(model_id) {
            return Err(DispatchError::invalid_model(
                model_id.as_str(),
                "Model not supported",
            ));
        }

        let slot = self.slot(model_id).await;

        let chain = slot
            .get_or_try_init(|| async {
                let chain = self.builder.build(model_id)?;

                info!(
                    model = %model_id,
                    invokers = chain.len(),
                    "Built fallback chain"
                );

                Ok::<_, DispatchError>(Arc::new(chain))
            })
            .await?;

        Ok(chain.clone())
    }

    /// Whether a chain has already been built for the model
    pub async fn contains(&self, model_id: &ModelId) -> bool {
        self.chains
            .read()
            .await
            .get(model_id)
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of built chains
    pub async fn len(&self) -> usize {
        self.chains
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn slot(&self, model_id: &ModelId) -> ChainSlot {
        if let Some(slot) = self.chains.read().await.get(model_id) {
            return slot.clone();
        }

        let mut chains = self.chains.write().await;
        chains.entry(model_id.clone()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::{ChainConfig, ProviderBindings};
    use crate::domain::invoker::mock::{MockInvoker, RecordingFactory};
    use crate::domain::invoker::MockInvokerFactory;
    use crate::domain::retry::RetryPolicy;
    use crate::domain::Invoker;

    fn model(id: &str) -> ModelId {
        ModelId::new(id).unwrap()
    }

    fn config() -> Arc<ChainConfig> {
        let bindings = ProviderBindings::new()
            .with_model(model("m1"), ["p1", "p2"])
            .with_model(model("m2"), ["p3"]);

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

    fn registry(factory: Arc<RecordingFactory>) -> ChainRegistry {
        ChainRegistry::new(ChainBuilder::new(config(), factory))
    }

    #[tokio::test]
    async fn test_same_chain_returned_twice() {
        let factory = Arc::new(RecordingFactory::succeeding());
        let registry = registry(factory.clone());

        let first = registry.get_or_build(&model("m1")).await.unwrap();
        let second = registry.get_or_build(&model("m1")).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.creations(), 6);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_models_get_distinct_chains() {
        let factory = Arc::new(RecordingFactory::succeeding());
        let registry = registry(factory.clone());

        let m1 = registry.get_or_build(&model("m1")).await.unwrap();
        let m2 = registry.get_or_build(&model("m2")).await.unwrap();

        assert!(!Arc::ptr_eq(&m1, &m2));
        assert_eq!(m1.len(), 6);
        assert_eq!(m2.len(), 4);
        assert_eq!(factory.creations(), 10);
        assert!(registry.contains(&model("m2")).await);
    }

    #[tokio::test]
    async fn test_unknown_model_is_invalid() {
        let mut factory = MockInvokerFactory::new();
        factory.expect_create().never();
        let registry = ChainRegistry::new(ChainBuilder::new(config(), Arc::new(factory)));

        let result = registry.get_or_build(&model("unknown")).await;

        assert!(matches!(result, Err(DispatchError::InvalidModel { .. })));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_build_is_not_cached() {
        let mut factory = MockInvokerFactory::new();
        let mut seq = mockall::Sequence::new();
        factory
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DispatchError::configuration("transport unavailable")));
        factory
            .expect_create()
            .times(6)
            .in_sequence(&mut seq)
            .returning(|spec| Ok(Arc::new(MockInvoker::succeeding(spec.label())) as Arc<dyn Invoker>));

        let registry = ChainRegistry::new(ChainBuilder::new(config(), Arc::new(factory)));

        assert!(registry.get_or_build(&model("m1")).await.is_err());
        assert!(!registry.contains(&model("m1")).await);

        let chain = registry.get_or_build(&model("m1")).await.unwrap();
        assert_eq!(chain.len(), 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_build() {
        let factory = Arc::new(RecordingFactory::succeeding());
        let registry = Arc::new(registry(factory.clone()));
        let barrier = Arc::new(tokio::sync::Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    registry.get_or_build(&model("m1")).await
                })
            })
            .collect();

        let chains: Vec<Arc<FallbackChain>> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert_eq!(factory.creations(), 6);
        assert!(chains.iter().all(|c| Arc::ptr_eq(c, &chains[0])));
    }
}
