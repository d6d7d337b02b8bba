//! Packed document envelope
//!
//! ```text
//! {
//!   "<type>": [record, ...],            // always present
//!   "linked": {"<type>": [record, ...]}, // when any relationship was resolved
//!   "links": {"<type>.<ref>": {...}}     // when link templates are enabled
//! }
//! ```

use crate::link::LinkTemplate;
use crate::one_or_many::OneOrMany;
use crate::types::ResourceType;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A flattened JSON object
pub type Record = Map<String, Value>;

/// Link templates keyed by `"{type}.{ref}"`
pub type LinkTemplates = BTreeMap<String, LinkTemplate>;

/// Related records grouped by their resource type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linked {
    buckets: BTreeMap<String, Vec<Value>>,
}

impl Linked {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add related value(s) to the bucket of `resource_type`; sequences are spread.
    /// The bucket is created even when `related` is an empty sequence.
    pub fn extend(&mut self, resource_type: &ResourceType, related: OneOrMany<Value>) {
        let bucket = self.bucket_mut(resource_type);
        match related {
            OneOrMany::One(item) => bucket.push(item),
            OneOrMany::Many(items) => bucket.extend(items),
        }
    }

    /// Record that a relationship of `resource_type` was resolved without adding any record
    pub fn touch(&mut self, resource_type: &ResourceType) {
        self.bucket_mut(resource_type);
    }

    fn bucket_mut(&mut self, resource_type: &ResourceType) -> &mut Vec<Value> {
        self.buckets
            .entry(resource_type.as_str().to_string())
            .or_default()
    }

    /// Records collected for one type
    pub fn get(&self, resource_type: &str) -> Option<&[Value]> {
        self.buckets.get(resource_type).map(Vec::as_slice)
    }

    /// Total number of collected records across all types
    pub fn record_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Number of buckets, one per related type seen
    pub fn type_count(&self) -> usize {
        self.buckets.len()
    }

    /// True when no relationship was resolved
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Append every bucket of `other` onto this one
    pub fn merge(&mut self, other: Linked) {
        for (resource_type, items) in other.buckets {
            self.buckets.entry(resource_type).or_default().extend(items);
        }
    }

    /// Iterate over `(type, records)` in type order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.buckets
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Serialize for Linked {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (resource_type, items) in self.iter() {
            map.serialize_entry(resource_type, items)?;
        }
        map.end()
    }
}

/// Result of packing one or more records of a single resource type
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    resource_type: ResourceType,
    data: Vec<Record>,
    linked: Option<Linked>,
    links: Option<LinkTemplates>,
}

impl Envelope {
    /// Assemble an envelope; `linked` is dropped when no relationship was resolved
    pub fn new(
        resource_type: ResourceType,
        data: Vec<Record>,
        linked: Option<Linked>,
        links: Option<LinkTemplates>,
    ) -> Self {
        Self {
            resource_type,
            data,
            linked: linked.filter(|l| !l.is_empty()),
            links,
        }
    }

    /// Primary resource type
    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    /// Flattened primary records
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Related records, if any were collected
    pub fn linked(&self) -> Option<&Linked> {
        self.linked.as_ref()
    }

    /// Link templates, if enabled
    pub fn links(&self) -> Option<&LinkTemplates> {
        self.links.as_ref()
    }

    /// Combine with an envelope of the same type packed from other records.
    ///
    /// Primary data is concatenated and linked buckets are merged per type.
    /// Templates depend only on the wrapper, so the first present set is kept.
    pub fn merge(mut self, other: Envelope) -> Self {
        debug_assert_eq!(self.resource_type, other.resource_type);
        self.data.extend(other.data);
        self.linked = match (self.linked.take(), other.linked) {
            (Some(mut a), Some(b)) => {
                a.merge(b);
                Some(a)
            }
            (a, b) => a.or(b),
        };
        if self.links.is_none() {
            self.links = other.links;
        }
        self
    }

    /// Convert into the JSON document
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).expect("envelope keys are strings")
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.resource_type.as_str(), &self.data)?;
        if let Some(linked) = &self.linked {
            map.serialize_entry("linked", linked)?;
        }
        if let Some(links) = &self.links {
            map.serialize_entry("links", links)?;
        }
        map.end()
    }
}
