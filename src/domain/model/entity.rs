//! Model identifier entity

use serde::{Deserialize, Serialize};

use super::validation::{validate_model_id, ModelValidationError};

/// Model identifier as understood by the upstream providers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    /// Create a new ModelId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ModelValidationError> {
        let id = id.into();
        validate_model_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelId {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_roundtrips_through_serde() {
        let id: ModelId = serde_json::from_str("\"google/gemma-3-27b-it\"").unwrap();
        assert_eq!(id.as_str(), "google/gemma-3-27b-it");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"google/gemma-3-27b-it\"");
    }

    #[test]
    fn test_model_id_rejects_invalid_on_deserialize() {
        let result: Result<ModelId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
