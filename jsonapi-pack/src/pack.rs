//! The pack algorithm
//!
//! For every input record and every declared reference (in registration order):
//! 1. Skip the reference when its property is absent
//! 2. Validate the value's shape against the declared cardinality
//! 3. Extract the related id(s) and build the link (compact or verbose)
//! 4. Move the related record(s) into the `linked` bucket of the target type
//! 5. Remove the property from the record
//!
//! Any shape error aborts the whole call; no partial envelope is returned.

use crate::reference::Reference;
use crate::wrapper::Wrapper;
use jsonapi_format::{
    json_type_name, Cardinality, Envelope, JsonApiError, Link, Linked, OneOrMany, ResourceLink,
    Result,
};
use serde_json::{Map, Value};

/// Record field receiving the per-record links
pub const LINKS_FIELD: &str = "links";

/// Identifier field read from related records
pub const ID_FIELD: &str = "id";

impl Wrapper {
    /// Pack a single record or an array of records.
    ///
    /// `data` is deep-copied; the caller's value is never modified.
    pub fn pack(&self, data: &Value) -> Result<Envelope> {
        self.pack_items(OneOrMany::from_value(data.clone()).into_vec())
    }

    /// Pack an explicit batch of records
    pub fn pack_records(&self, records: &[Value]) -> Result<Envelope> {
        self.pack_items(records.to_vec())
    }

    fn pack_items(&self, items: Vec<Value>) -> Result<Envelope> {
        let _span = tracing::debug_span!(
            "pack",
            resource = %self.resource_type(),
            records = items.len()
        )
        .entered();

        let mut data = Vec::with_capacity(items.len());
        let mut linked = Linked::new();

        for (index, item) in items.into_iter().enumerate() {
            let mut record = match item {
                Value::Object(record) => record,
                other => {
                    return Err(JsonApiError::InvalidRecord {
                        index,
                        found: json_type_name(&other),
                    })
                }
            };

            let mut links: Option<Map<String, Value>> = None;
            for reference in self.references() {
                let Some(value) = record.remove(reference.name()) else {
                    continue;
                };
                let link = match self.resolve_reference(reference, value, &mut linked) {
                    Ok(link) => link,
                    Err(err) => {
                        tracing::debug!(record = index, error = %err, "pack aborted");
                        return Err(err);
                    }
                };
                links
                    .get_or_insert_with(Map::new)
                    .insert(reference.name().to_string(), link);
            }

            if let Some(links) = links {
                if record.contains_key(LINKS_FIELD) {
                    tracing::warn!(
                        resource = %self.resource_type(),
                        record = index,
                        "record attribute `links` replaced by relationship links"
                    );
                }
                record.insert(LINKS_FIELD.to_string(), Value::Object(links));
            }
            data.push(record);
        }

        let links = if self.context().url_templates() {
            self.link_templates()
        } else {
            None
        };

        tracing::debug!(records = data.len(), linked = linked.record_count(), "packed");
        Ok(Envelope::new(
            self.resource_type().clone(),
            data,
            Some(linked),
            links,
        ))
    }

    /// Validate one relationship value, collect its related records and
    /// return the link value for the record.
    fn resolve_reference(
        &self,
        reference: &Reference,
        value: Value,
        linked: &mut Linked,
    ) -> Result<Value> {
        let related = match (reference.cardinality(), value) {
            // Explicitly empty to-one relationship
            (Cardinality::One, Value::Null) => {
                linked.touch(reference.target());
                return Ok(Value::Null);
            }
            (Cardinality::One, Value::Array(_)) => {
                return Err(JsonApiError::expected_one(reference.name()))
            }
            (Cardinality::One, value) => OneOrMany::One(value),
            (Cardinality::Many, value @ Value::Array(_)) => OneOrMany::from_value(value),
            (Cardinality::Many, _) => return Err(JsonApiError::expected_many(reference.name())),
        };

        let ids = related
            .as_ref()
            .try_map(|item, idx| related_id(reference, item, idx))?;
        debug_assert_eq!(ids.is_many(), reference.is_to_many());

        let link: Value = if self.context().verbose() {
            let base_url = self.context().base_url();
            ids.map(|id, _| Link::Resource(ResourceLink::new(base_url, reference.target(), id)))
                .into()
        } else {
            ids.map(|id, _| Link::Id(id)).into()
        };

        tracing::trace!(
            reference = reference.name(),
            target = %reference.target(),
            related = related.len(),
            "resolved reference"
        );
        linked.extend(reference.target(), related);
        Ok(link)
    }
}

fn related_id(reference: &Reference, item: &Value, index: usize) -> Result<Value> {
    item.as_object()
        .and_then(|record| record.get(ID_FIELD))
        .cloned()
        .ok_or_else(|| JsonApiError::missing_id(reference.name(), index, json_type_name(item)))
}
