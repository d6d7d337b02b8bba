//! Resource wrapper: a resource type plus its declared relationships

use crate::reference::Reference;
use jsonapi_format::{Context, Result, ResourceType};
use std::sync::Arc;

/// Describes one resource type and packs records of that type.
///
/// Register relationships with [`reference`](Self::reference) (or the
/// `reference_one` / `reference_many` shorthands), then call
/// [`pack`](Self::pack) any number of times. Packing reads the wrapper and its
/// context but never mutates them, so a wrapper can be shared across threads.
#[derive(Debug, Clone)]
pub struct Wrapper {
    resource_type: ResourceType,
    context: Arc<Context>,
    references: Vec<Reference>,
}

impl Wrapper {
    /// Create a wrapper for `resource_type` (must be non-empty)
    pub fn new(resource_type: &str, context: Arc<Context>) -> Result<Self> {
        Ok(Self {
            resource_type: ResourceType::new(resource_type)?,
            context,
            references: Vec::new(),
        })
    }

    /// Resource type handle
    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    /// Resource type name
    pub fn type_name(&self) -> &str {
        self.resource_type.as_str()
    }

    /// Shared packing context
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Declared relationships in registration order
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Append a relationship definition
    pub fn reference(&mut self, reference: Reference) {
        tracing::debug!(
            resource = %self.resource_type,
            reference = reference.name(),
            target = %reference.target(),
            cardinality = %reference.cardinality(),
            "registered reference"
        );
        self.references.push(reference);
    }

    /// Declare a to-one relationship stored under `name`
    pub fn reference_one(&mut self, name: impl Into<String>, resource: &Wrapper) {
        self.reference(Reference::one(name, resource));
    }

    /// Declare a to-many relationship stored under `name`
    pub fn reference_many(&mut self, name: impl Into<String>, resource: &Wrapper) {
        self.reference(Reference::many(name, resource));
    }
}
