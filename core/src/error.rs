use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelsqlError {
    /// The root model of a compile is not in the registry
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// A filter named a property the model does not declare (strict mode)
    #[error("Unknown property {property} for model {model}")]
    UnknownProperty { model: String, property: String },

    /// A filter named a relation the model does not declare (strict mode)
    #[error("Unknown relation {relation} for model {model}")]
    UnknownRelation { model: String, relation: String },

    /// Filter is structurally unusable
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Table, column or model name that cannot be emitted safely
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Model metadata is inconsistent
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Error executing a statement
    #[error("Execution error: {0}")]
    Execution(String),

    /// Error mapping a result row
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for compile and execution operations
pub type Result<T> = std::result::Result<T, RelsqlError>;
