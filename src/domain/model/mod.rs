//! Model identifiers

mod entity;
mod validation;

pub use entity::ModelId;
pub use validation::{validate_model_id, ModelValidationError, MAX_MODEL_ID_LENGTH};
