//! Chain configuration - credential lists, provider bindings and retry policy

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::retry::RetryPolicy;
use crate::domain::{Credential, DispatchError, ModelId, ProviderTier};

/// Model → ordered secondary-provider names
///
/// A model bound to an empty list is served by the primary tier only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderBindings {
    models: HashMap<ModelId, Vec<String>>,
}

impl ProviderBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model<I, S>(mut self, model_id: ModelId, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(model_id, providers);
        self
    }

    pub fn insert<I, S>(&mut self, model_id: ModelId, providers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models
            .insert(model_id, providers.into_iter().map(Into::into).collect());
    }

    pub fn providers_for(&self, model_id: &ModelId) -> Option<&[String]> {
        self.models.get(model_id).map(Vec::as_slice)
    }

    pub fn contains(&self, model_id: &ModelId) -> bool {
        self.models.contains_key(model_id)
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelId> {
        self.models.keys()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Immutable, validated input for chain construction
#[derive(Debug, Clone)]
pub struct ChainConfig {
    primary_credentials: Vec<Credential>,
    secondary_credentials: Vec<Credential>,
    bindings: ProviderBindings,
    retry_policy: Arc<RetryPolicy>,
}

impl ChainConfig {
    /// Validate and assemble a chain configuration
    ///
    /// Credential order is kept; it defines priority within each tier.
    pub fn new<P, S>(
        primary_credentials: P,
        secondary_credentials: S,
        bindings: ProviderBindings,
        retry_policy: RetryPolicy,
    ) -> Result<Self, DispatchError>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let config = Self {
            primary_credentials: to_credentials(ProviderTier::Primary, primary_credentials),
            secondary_credentials: to_credentials(ProviderTier::Secondary, secondary_credentials),
            bindings,
            retry_policy: Arc::new(retry_policy),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn primary_credentials(&self) -> &[Credential] {
        &self.primary_credentials
    }

    pub fn secondary_credentials(&self) -> &[Credential] {
        &self.secondary_credentials
    }

    pub fn bindings(&self) -> &ProviderBindings {
        &self.bindings
    }

    pub fn retry_policy(&self) -> &Arc<RetryPolicy> {
        &self.retry_policy
    }

    /// Number of chain elements a model expands to, if it is registered
    pub fn invoker_count(&self, model_id: &ModelId) -> Option<usize> {
        self.bindings.providers_for(model_id).map(|providers| {
            self.primary_credentials.len() + self.secondary_credentials.len() * providers.len()
        })
    }

    fn validate(&self) -> Result<(), DispatchError> {
        if self.bindings.is_empty() {
            return Err(DispatchError::configuration("No models configured"));
        }

        for credential in self
            .primary_credentials
            .iter()
            .chain(self.secondary_credentials.iter())
        {
            if credential.secret().trim().is_empty() {
                return Err(DispatchError::configuration(format!(
                    "Credential {} is empty",
                    credential.label()
                )));
            }
        }

        for model_id in self.bindings.models() {
            let providers = self.bindings.providers_for(model_id).unwrap_or_default();
            let mut seen = HashSet::new();

            for provider in providers {
                if provider.trim().is_empty() {
                    return Err(DispatchError::configuration(format!(
                        "Model '{}' has an empty provider name",
                        model_id
                    )));
                }

                if !seen.insert(provider.as_str()) {
                    return Err(DispatchError::configuration(format!(
                        "Model '{}' lists provider '{}' more than once",
                        model_id, provider
                    )));
                }
            }

            if self.invoker_count(model_id) == Some(0) {
                return Err(DispatchError::configuration(format!(
                    "Model '{}' expands to no invokers: configure primary credentials, \
                     or secondary credentials together with at least one provider",
                    model_id
                )));
            }
        }

        Ok(())
    }
}

fn to_credentials<I>(tier: ProviderTier, secrets: I) -> Vec<Credential>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    secrets
        .into_iter()
        .enumerate()
        .map(|(position, secret)| Credential::new(tier, position, secret))
        .collect()
}
