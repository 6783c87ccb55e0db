use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{InvokerSpec, LlmRequest, LlmResponse};
use crate::domain::{DispatchError, InvocationError};

/// Executes one request against one provider/credential pair
#[async_trait]
pub trait Invoker: Send + Sync + Debug {
    /// Run the request once; retries are the caller's concern
    async fn invoke(&self, request: &LlmRequest) -> Result<LlmResponse, InvocationError>;

    /// Provider name used in logs and errors
    fn provider_name(&self) -> &str;
}

/// Builds invokers during chain construction
///
/// Called exactly once per chain element.
#[cfg_attr(test, automock)]
pub trait InvokerFactory: Send + Sync {
    fn create(&self, spec: &InvokerSpec) -> Result<Arc<dyn Invoker>, DispatchError>;
}
