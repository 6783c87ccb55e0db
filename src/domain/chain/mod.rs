//! Fallback chain domain - construction, execution and caching

mod builder;
mod config;
mod fallback;
mod registry;

pub use builder::ChainBuilder;
pub use config::{ChainConfig, ProviderBindings};
pub use fallback::FallbackChain;
pub use registry::ChainRegistry;
