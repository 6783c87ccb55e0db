//! Bounded retry around a single invoker

mod policy;
mod retrying_invoker;

pub use policy::RetryPolicy;
pub use retrying_invoker::RetryingInvoker;
