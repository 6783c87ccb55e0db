use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::domain::{ChainConfig, DispatchError, ModelId, ProviderBindings, RetryPolicy};
use crate::infrastructure::llm::{
    EndpointConfig, DEFAULT_PRIMARY_BASE_URL, DEFAULT_PRIMARY_NAME, DEFAULT_SECONDARY_BASE_URL,
    DEFAULT_SECONDARY_NAME,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Provider tiers, model table and retry settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub primary: ProviderTierConfig,
    pub secondary: ProviderTierConfig,
    pub retry: RetrySettings,
    pub models: Vec<ModelBindingConfig>,
    /// Per-request HTTP timeout
    pub request_timeout_ms: u64,
    pub temperature: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            primary: ProviderTierConfig::default(),
            secondary: ProviderTierConfig::default(),
            retry: RetrySettings::default(),
            models: vec![ModelBindingConfig {
                id: "google/gemma-3-27b-it".to_string(),
                providers: vec![
                    "nebius".to_string(),
                    "featherless-ai".to_string(),
                    "scaleway".to_string(),
                ],
            }],
            request_timeout_ms: 60_000,
            temperature: 0.0,
        }
    }
}

/// One provider tier; name and base URL fall back to the tier's defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderTierConfig {
    pub name: Option<String>,
    pub base_url: Option<String>,
    /// Ordered list, or a comma-separated string when set from the environment
    #[serde(deserialize_with = "credential_list")]
    pub credentials: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub wait_schedule_ms: Vec<u64>,
    pub retry_permanent_failures: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait_schedule_ms: vec![3_000, 5_000, 6_000],
            retry_permanent_failures: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelBindingConfig {
    pub id: String,
    #[serde(default)]
    pub providers: Vec<String>,
}

fn credential_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CredentialList {
        List(Vec<String>),
        Joined(String),
        // Environment values are type-parsed, so digit-only keys arrive as numbers
        Integer(i64),
        Bool(bool),
    }

    let credentials = match CredentialList::deserialize(deserializer)? {
        CredentialList::List(list) => list,
        CredentialList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        CredentialList::Integer(value) => vec![value.to_string()],
        CredentialList::Bool(value) => vec![value.to_string()],
    };

    Ok(credentials)
}

impl AppConfig {
    /// Load defaults, optional files, then `APP__`-prefixed environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(environment("APP"))
            .build()?;

        config.try_deserialize()
    }
}

fn environment(prefix: &str) -> config::Environment {
    config::Environment::with_prefix(prefix)
        .separator("__")
        .try_parsing(true)
}

impl DispatchConfig {
    /// Validate into the engine's immutable chain configuration
    pub fn chain_config(&self) -> Result<ChainConfig, DispatchError> {
        ChainConfig::new(
            self.primary.credentials.iter().cloned(),
            self.secondary.credentials.iter().cloned(),
            self.bindings()?,
            self.retry_policy()?,
        )
    }

    pub fn bindings(&self) -> Result<ProviderBindings, DispatchError> {
        let mut bindings = ProviderBindings::new();
        let mut seen = HashSet::new();

        for model in &self.models {
            let model_id = ModelId::new(model.id.as_str()).map_err(|e| {
                DispatchError::configuration(format!("Invalid model id '{}': {}", model.id, e))
            })?;

            if !seen.insert(model_id.clone()) {
                return Err(DispatchError::configuration(format!(
                    "Model '{}' is configured more than once",
                    model.id
                )));
            }

            bindings.insert(model_id, model.providers.iter().cloned());
        }

        Ok(bindings)
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, DispatchError> {
        let schedule = self
            .retry
            .wait_schedule_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect();

        Ok(RetryPolicy::new(self.retry.max_attempts, schedule)?
            .with_retry_permanent_failures(self.retry.retry_permanent_failures))
    }

    pub fn primary_endpoint(&self) -> EndpointConfig {
        endpoint(&self.primary, DEFAULT_PRIMARY_NAME, DEFAULT_PRIMARY_BASE_URL)
    }

    pub fn secondary_endpoint(&self) -> EndpointConfig {
        endpoint(&self.secondary, DEFAULT_SECONDARY_NAME, DEFAULT_SECONDARY_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn endpoint(tier: &ProviderTierConfig, default_name: &str, default_base_url: &str) -> EndpointConfig {
    EndpointConfig::new(
        tier.name.as_deref().unwrap_or(default_name),
        tier.base_url.as_deref().unwrap_or(default_base_url),
    )
}
