//! HTTP invokers for OpenAI-compatible providers

mod chat_completions;
mod factory;
mod http_client;

pub use chat_completions::ChatCompletionsInvoker;
pub use factory::{
    EndpointConfig, HttpInvokerFactory, DEFAULT_PRIMARY_BASE_URL, DEFAULT_PRIMARY_NAME,
    DEFAULT_SECONDARY_BASE_URL, DEFAULT_SECONDARY_NAME,
};
pub use http_client::{classify_status, HttpClient, HttpClientTrait};
