//! Error types for JSON API packing

use thiserror::Error;

/// JSON API error types
#[derive(Debug, Error)]
pub enum JsonApiError {
    /// Relationship data does not match the declared cardinality.
    #[error("`{property}` {reason}")]
    ShapeMismatch {
        /// Relationship property that held the offending value
        property: String,
        /// What was wrong with the value
        reason: String,
    },
    /// A primary item handed to `pack` is not a JSON object.
    #[error("Record at index {index} must be an object, found {found}")]
    InvalidRecord {
        /// Position of the item in the packed batch
        index: usize,
        /// JSON type that was found instead
        found: &'static str,
    },
    /// Resource type names must be non-empty.
    #[error("Invalid resource type: {resource_type:?}")]
    InvalidResourceType {
        /// The rejected type name
        resource_type: String,
    },
    /// Options passed to the context were not usable.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// One line of newline-delimited input is not valid JSON.
    #[error("Invalid JSON on line {line}: {source}")]
    InvalidLine {
        /// 1-based line number
        line: usize,
        /// Parser error for that line
        source: serde_json::Error,
    },
}

impl JsonApiError {
    /// A to-many relationship received a single (non-array) value.
    pub fn expected_many(property: &str) -> Self {
        JsonApiError::ShapeMismatch {
            property: property.to_string(),
            reason: "is to-many reference, but data is to-one.".to_string(),
        }
    }

    /// A to-one relationship received an array.
    pub fn expected_one(property: &str) -> Self {
        JsonApiError::ShapeMismatch {
            property: property.to_string(),
            reason: "is to-one reference, but data is to-many.".to_string(),
        }
    }

    /// A related value has no usable `id`.
    pub fn missing_id(property: &str, index: usize, found: &'static str) -> Self {
        JsonApiError::ShapeMismatch {
            property: property.to_string(),
            reason: format!(
                "holds a related {} at index {} without an `id` field.",
                found, index
            ),
        }
    }

    /// Whether this is a cardinality/shape error raised while packing.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, JsonApiError::ShapeMismatch { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, JsonApiError>;
