//! Relationship definitions

use crate::wrapper::Wrapper;
use jsonapi_format::{Cardinality, ResourceType};

/// A declared relationship from one resource type to another.
///
/// Cardinality is fixed here and never inferred from data; packing validates
/// the data against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    name: String,
    target: ResourceType,
    cardinality: Cardinality,
}

impl Reference {
    /// Relationship stored under `name`, pointing at `target`
    pub fn new(name: impl Into<String>, target: ResourceType, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            target,
            cardinality,
        }
    }

    /// To-one relationship to the resource described by `resource`
    pub fn one(name: impl Into<String>, resource: &Wrapper) -> Self {
        Self::new(name, resource.resource_type().clone(), Cardinality::One)
    }

    /// To-many relationship to the resource described by `resource`
    pub fn many(name: impl Into<String>, resource: &Wrapper) -> Self {
        Self::new(name, resource.resource_type().clone(), Cardinality::Many)
    }

    /// Record property holding the related value(s)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Related resource type
    pub fn target(&self) -> &ResourceType {
        &self.target
    }

    /// Declared cardinality
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Whether the relationship is to-many
    pub fn is_to_many(&self) -> bool {
        self.cardinality.is_many()
    }
}
