//! Fallback chain - ordered retrying invokers tried until one succeeds

use tracing::{info, warn};

use crate::domain::retry::RetryingInvoker;
use crate::domain::{DispatchError, LlmRequest, LlmResponse, ModelId};

/// Ordered, non-empty set of retrying invokers for one model
///
/// Immutable once built; shared between callers behind an `Arc`.
#[derive(Debug)]
pub struct FallbackChain {
    model_id: ModelId,
    elements: Vec<RetryingInvoker>,
}

impl FallbackChain {
    pub fn new(model_id: ModelId, elements: Vec<RetryingInvoker>) -> Result<Self, DispatchError> {
        if elements.is_empty() {
            return Err(DispatchError::empty_chain(model_id.as_str()));
        }

        Ok(Self { model_id, elements })
    }

    pub fn model_id(&self) -> &ModelId {
        &self.model_id
    }

    pub fn elements(&self) -> &[RetryingInvoker] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.elements.iter().map(RetryingInvoker::label).collect()
    }

    /// Execute the request, falling over element by element
    ///
    /// Returns the first success without touching later elements. When
    /// every element is exhausted the error carries each element's failure.
    pub async fn execute(&self, request: &LlmRequest) -> Result<LlmResponse, DispatchError> {
        let mut failures = Vec::with_capacity(self.elements.len());

        for (position, element) in self.elements.iter().enumerate() {
            match element.invoke(request).await {
                Ok(response) => {
                    info!(
                        model = %self.model_id,
                        invoker = %element.label(),
                        position = position,
                        fallbacks = failures.len(),
                        "Request served"
                    );
                    return Ok(response);
                }
                Err(exhausted) => {
                    if position + 1 < self.elements.len() {
                        warn!(
                            model = %self.model_id,
                            invoker = %exhausted.label,
                            attempts = exhausted.attempts,
                            error = %exhausted.last_error,
                            "Falling back to next invoker"
                        );
                    }
                    failures.push(exhausted);
                }
            }
        }

        let Some(last) = failures.last() else {
            return Err(DispatchError::empty_chain(self.model_id.as_str()));
        };
        let last_error = last.last_error.clone();

        warn!(
            model = %self.model_id,
            tried = failures.len(),
            error = %last_error,
            "All providers exhausted"
        );

        Err(DispatchError::ChainExhausted {
            model: self.model_id.to_string(),
            tried: failures.len(),
            last_error,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoker::mock::{call_log, MockInvoker};
    use crate::domain::retry::RetryPolicy;
    use crate::domain::{Credential, InvokerSpec, ProviderTier};
    use std::sync::Arc;

    fn model() -> ModelId {
        ModelId::new("m1").unwrap()
    }

    fn element(position: usize, invoker: Arc<MockInvoker>, policy: &Arc<RetryPolicy>) -> RetryingInvoker {
        let spec = InvokerSpec::new(
            Credential::new(ProviderTier::Primary, position, "key"),
            model(),
            position,
        );
        RetryingInvoker::new(spec, invoker, policy.clone())
    }

    /// Chain of `n` invokers where only the k-th (1-indexed) succeeds
    fn kth_succeeds(n: usize, k: Option<usize>) -> (FallbackChain, Vec<Arc<MockInvoker>>) {
        let policy = Arc::new(RetryPolicy::immediate(3).unwrap());
        let invokers: Vec<Arc<MockInvoker>> = (1..=n)
            .map(|i| {
                let name = format!("invoker-{}", i);
                if Some(i) == k {
                    Arc::new(MockInvoker::succeeding(name))
                } else {
                    Arc::new(MockInvoker::failing(name))
                }
            })
            .collect();

        let elements = invokers
            .iter()
            .enumerate()
            .map(|(position, invoker)| element(position, invoker.clone(), &policy))
            .collect();

        (FallbackChain::new(model(), elements).unwrap(), invokers)
    }

    #[test]
    fn test_empty_chain_rejected() {
        let result = FallbackChain::new(model(), Vec::new());
        assert!(matches!(result, Err(DispatchError::EmptyChain { .. })));
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let (chain, invokers) = kth_succeeds(4, Some(1));

        let response = chain.execute(&LlmRequest::prompt("hi")).await.unwrap();

        assert_eq!(response.content(), Some("response from invoker-1"));
        assert_eq!(invokers[0].calls(), 1);
        assert!(invokers[1..].iter().all(|i| i.calls() == 0));
    }

    #[tokio::test]
    async fn test_only_first_k_invokers_called() {
        for k in 1..=5 {
            let (chain, invokers) = kth_succeeds(5, Some(k));

            let response = chain.execute(&LlmRequest::prompt("hi")).await.unwrap();
            assert_eq!(
                response.content().map(str::to_string),
                Some(format!("response from invoker-{}", k))
            );

            for (index, invoker) in invokers.iter().enumerate() {
                let expected = match (index + 1).cmp(&k) {
                    std::cmp::Ordering::Less => 3,
                    std::cmp::Ordering::Equal => 1,
                    std::cmp::Ordering::Greater => 0,
                };
                assert_eq!(invoker.calls(), expected, "k={} invoker={}", k, index + 1);
            }
        }
    }

    #[tokio::test]
    async fn test_all_failing_exhausts_full_budget() {
        let (chain, invokers) = kth_succeeds(3, None);

        let error = chain.execute(&LlmRequest::prompt("hi")).await.unwrap_err();

        match error {
            DispatchError::ChainExhausted {
                model,
                tried,
                last_error,
                failures,
            } => {
                assert_eq!(model, "m1");
                assert_eq!(tried, 3);
                assert_eq!(last_error.provider(), "invoker-3");
                assert_eq!(failures.len(), 3);
                assert!(failures.iter().all(|f| f.attempts == 3));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(invokers.iter().all(|i| i.calls() == 3));
    }

    #[tokio::test]
    async fn test_execution_order_follows_elements() {
        let log = call_log();
        let policy = Arc::new(RetryPolicy::immediate(1).unwrap());
        let elements = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let invoker = if *name == "c" {
                    MockInvoker::succeeding(*name)
                } else {
                    MockInvoker::failing(*name)
                };
                element(position, Arc::new(invoker.with_log(log.clone())), &policy)
            })
            .collect();
        let chain = FallbackChain::new(model(), elements).unwrap();

        chain.execute(&LlmRequest::prompt("hi")).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }
}
