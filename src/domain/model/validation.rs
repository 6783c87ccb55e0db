//! Model id validation

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for model IDs
pub const MAX_MODEL_ID_LENGTH: usize = 128;

/// Provider-style model ids: `google/gemma-3-27b-it`, `openai/gpt-4o:beta`
static MODEL_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:/@-]*$").unwrap());

/// Model validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    /// Model ID is empty
    EmptyId,
    /// Model ID exceeds maximum length
    IdTooLong { length: usize, max: usize },
    /// Model ID contains invalid characters
    InvalidIdFormat { id: String },
}

impl fmt::Display for ModelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Model ID cannot be empty"),
            Self::IdTooLong { length, max } => {
                write!(f, "Model ID too long: {} characters (max {})", length, max)
            }
            Self::InvalidIdFormat { id } => {
                write!(
                    f,
                    "Invalid model ID format '{}': must start with an alphanumeric character and contain no whitespace",
                    id
                )
            }
        }
    }
}

impl std::error::Error for ModelValidationError {}

/// Validate a model ID
pub fn validate_model_id(id: &str) -> Result<(), ModelValidationError> {
    if id.is_empty() {
        return Err(ModelValidationError::EmptyId);
    }

    if id.len() > MAX_MODEL_ID_LENGTH {
        return Err(ModelValidationError::IdTooLong {
            length: id.len(),
            max: MAX_MODEL_ID_LENGTH,
        });
    }

    if !MODEL_ID_PATTERN.is_match(id) {
        return Err(ModelValidationError::InvalidIdFormat { id: id.to_string() });
    }

    Ok(())
}
