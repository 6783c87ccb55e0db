use crate::domain::{Credential, ModelId, ProviderTier};

/// Everything an invoker factory needs to build one chain element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerSpec {
    credential: Credential,
    model_id: ModelId,
    provider: Option<String>,
    position: usize,
}

impl InvokerSpec {
    pub fn new(credential: Credential, model_id: ModelId, position: usize) -> Self {
        Self {
            credential,
            model_id,
            provider: None,
            position,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn tier(&self) -> ProviderTier {
        self.credential.tier()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn model_id(&self) -> &ModelId {
        &self.model_id
    }

    /// Secondary provider name, only set for the secondary tier
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Position of the element within its chain
    pub fn position(&self) -> usize {
        self.position
    }

    /// Log-safe label, e.g. `primary#1` or `secondary#0/nebius`
    pub fn label(&self) -> String {
        match &self.provider {
            Some(provider) => format!("{}/{}", self.credential.label(), provider),
            None => self.credential.label(),
        }
    }
}
