use std::fmt;

use thiserror::Error;

/// Classification of a single failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationErrorKind {
    /// Network failure or provider-side error (5xx)
    Transient,
    /// The provider did not answer in time
    Timeout,
    /// The provider rejected the call with a rate limit
    RateLimited,
    /// Authentication, authorization or request errors that will not heal on retry
    Permanent,
}

impl fmt::Display for InvocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Timeout => write!(f, "timeout"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Permanent => write!(f, "permanent"),
        }
    }
}

/// A single invoker call failed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{provider} invocation failed ({kind}): {message}")]
pub struct InvocationError {
    kind: InvocationErrorKind,
    provider: String,
    message: String,
}

impl InvocationError {
    pub fn new(
        kind: InvocationErrorKind,
        provider: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn transient(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::Transient, provider, message)
    }

    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::Timeout, provider, message)
    }

    pub fn rate_limited(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::RateLimited, provider, message)
    }

    pub fn permanent(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::Permanent, provider, message)
    }

    /// Re-attribute the error to another provider name
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn kind(&self) -> InvocationErrorKind {
        self.kind
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_permanent(&self) -> bool {
        self.kind == InvocationErrorKind::Permanent
    }
}

/// A retrying invoker used its whole attempt budget
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invoker '{label}' exhausted after {attempts} attempt(s): {last_error}")]
pub struct InvokerExhausted {
    pub label: String,
    pub attempts: u32,
    #[source]
    pub last_error: InvocationError,
}

/// Errors surfaced by chain construction and dispatch
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid model '{model}': {message}")]
    InvalidModel { model: String, message: String },

    #[error("All providers exhausted for model '{model}' after {tried} invoker(s); last error: {last_error}")]
    ChainExhausted {
        model: String,
        tried: usize,
        last_error: InvocationError,
        failures: Vec<InvokerExhausted>,
    },

    #[error("Chain for model '{model}' has no invokers")]
    EmptyChain { model: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DispatchError {
    pub fn invalid_model(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn empty_chain(model: impl Into<String>) -> Self {
        Self::EmptyChain {
            model: model.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn is_invalid_model(&self) -> bool {
        matches!(self, Self::InvalidModel { .. })
    }

    pub fn is_chain_exhausted(&self) -> bool {
        matches!(self, Self::ChainExhausted { .. })
    }
}
