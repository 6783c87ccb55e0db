//! Domain layer - the fallback-chain engine and its contracts

pub mod chain;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod invoker;
pub mod model;
pub mod retry;

pub use chain::{ChainBuilder, ChainConfig, ChainRegistry, FallbackChain, ProviderBindings};
pub use credentials::{Credential, ProviderTier};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, InvocationError, InvocationErrorKind, InvokerExhausted};
pub use invoker::{Invoker, InvokerFactory, InvokerSpec, LlmRequest, LlmResponse};
pub use model::{validate_model_id, ModelId, ModelValidationError};
pub use retry::{RetryPolicy, RetryingInvoker};
