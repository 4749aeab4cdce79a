use serde::Serialize;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entities not found: {entity} with ids {ids:?}")]
    NotFoundMany {
        entity: &'static str,
        ids: Vec<DbId>,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Batch validation failed: {0}")]
    BatchValidation(BatchValidationError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A rejected batch entry, located by its position in the request array.
///
/// `field` and `value` are only present when the failure concerns a single
/// field of the entry (missing or out-of-range score, for example).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchValidationError {
    pub message: String,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl BatchValidationError {
    pub fn at(index: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            index,
            field: None,
            value: None,
        }
    }

    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl std::fmt::Display for BatchValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (index {})", self.message, self.index)
    }
}

impl From<BatchValidationError> for CoreError {
    fn from(err: BatchValidationError) -> Self {
        CoreError::BatchValidation(err)
    }
}
