//! Resource type handles and relationship cardinality

use crate::error::{JsonApiError, Result};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shared, cheaply clonable resource type name (e.g. `"posts"`).
///
/// Relationship definitions hold this handle instead of the related wrapper,
/// so resource graphs may reference themselves or form cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceType(Arc<str>);

impl ResourceType {
    /// Create a resource type; the name must be non-empty
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(JsonApiError::InvalidResourceType {
                resource_type: name.to_string(),
            });
        }
        Ok(ResourceType(Arc::from(name)))
    }

    /// Borrow the type name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ResourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Relationship cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Property holds a single related record
    One,
    /// Property holds an array of related records
    Many,
}

impl Cardinality {
    /// Whether this is a to-many relationship
    pub fn is_many(self) -> bool {
        matches!(self, Cardinality::Many)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::One => f.write_str("to-one"),
            Cardinality::Many => f.write_str("to-many"),
        }
    }
}

/// Get a human-readable type name for a JSON value
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
