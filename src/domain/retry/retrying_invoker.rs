//! Retrying invoker - re-attempts one invoker according to a RetryPolicy

use std::sync::Arc;

use tracing::{debug, warn};

use super::RetryPolicy;
use crate::domain::{
    Invoker, InvokerExhausted, InvokerSpec, LlmRequest, LlmResponse,
};

/// One chain element: an invoker wrapped with its retry policy
#[derive(Debug, Clone)]
pub struct RetryingInvoker {
    spec: InvokerSpec,
    invoker: Arc<dyn Invoker>,
    policy: Arc<RetryPolicy>,
}

impl RetryingInvoker {
    pub fn new(spec: InvokerSpec, invoker: Arc<dyn Invoker>, policy: Arc<RetryPolicy>) -> Self {
        Self {
            spec,
            invoker,
            policy,
        }
    }

    pub fn spec(&self) -> &InvokerSpec {
        &self.spec
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn label(&self) -> String {
        self.spec.label()
    }

    /// Invoke until success or until the attempt budget is spent
    ///
    /// Waits suspend only the calling task.
    pub async fn invoke(&self, request: &LlmRequest) -> Result<LlmResponse, InvokerExhausted> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            let error = match self.invoker.invoke(request).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(
                            invoker = %self.spec.label(),
                            attempt = attempt,
                            "Invoker recovered after retry"
                        );
                    }
                    return Ok(response);
                }
                Err(error) => error,
            };

            let stop_early = error.is_permanent() && !self.policy.retry_permanent_failures();

            if attempt >= max_attempts || stop_early {
                warn!(
                    invoker = %self.spec.label(),
                    provider = self.invoker.provider_name(),
                    attempts = attempt,
                    error = %error,
                    "Invoker exhausted"
                );

                return Err(InvokerExhausted {
                    label: self.spec.label(),
                    attempts: attempt,
                    last_error: error,
                });
            }

            let wait = self.policy.wait_before_attempt(attempt + 1);

            debug!(
                invoker = %self.spec.label(),
                attempt = attempt,
                max_attempts = max_attempts,
                wait_ms = wait.as_millis() as u64,
                error = %error,
                "Invocation failed, retrying"
            );

            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }

            attempt += 1;
        }
    }
}
