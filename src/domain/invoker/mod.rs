//! Invoker domain - one request against one provider/credential pair

mod provider;
mod request;
mod response;
mod spec;

pub use provider::{Invoker, InvokerFactory};
pub use request::LlmRequest;
pub use response::LlmResponse;
pub use spec::InvokerSpec;

#[cfg(test)]
pub use provider::{mock, MockInvokerFactory};
