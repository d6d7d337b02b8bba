//! Link representations and URL construction

use crate::types::ResourceType;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Verbose link to a related resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceLink {
    /// Related record id, as found on the record
    pub id: Value,
    /// Related resource type
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// `base_url + type + "/" + id`
    pub href: String,
}

impl ResourceLink {
    /// Build the verbose link for `id` under `base_url`
    pub fn new(base_url: &str, resource_type: &ResourceType, id: Value) -> Self {
        let href = resource_href(base_url, resource_type, &id);
        Self {
            id,
            resource_type: resource_type.clone(),
            href,
        }
    }
}

/// One link value inside a packed record's `links` object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Link {
    /// Compact form: the bare id
    Id(Value),
    /// Verbose form: `{id, type, href}`
    Resource(ResourceLink),
}

impl From<Link> for Value {
    fn from(link: Link) -> Self {
        match link {
            Link::Id(id) => id,
            link @ Link::Resource(_) => {
                serde_json::to_value(link).expect("resource link keys are strings")
            }
        }
    }
}

/// URL pattern describing how to resolve one relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTemplate {
    /// Related resource type
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// `base_url + type + "/{" + key + "}"`
    pub href: String,
}

impl LinkTemplate {
    /// Template for the relationship stored under `key`
    pub fn new(base_url: &str, resource_type: &ResourceType, key: &str) -> Self {
        Self {
            resource_type: resource_type.clone(),
            href: format!("{}{}/{{{}}}", base_url, resource_type, key),
        }
    }
}

/// Template key for a relationship: `"{owner}.{reference}"`
pub fn template_key(owner: &ResourceType, reference: &str) -> String {
    format!("{}.{}", owner, reference)
}

/// Hyperlink to a related record: `base_url + type + "/" + id`
pub fn resource_href(base_url: &str, resource_type: &ResourceType, id: &Value) -> String {
    format!("{}{}/{}", base_url, resource_type, id_segment(id))
}

/// Strings are used verbatim, anything else as its JSON text
fn id_segment(id: &Value) -> Cow<'_, str> {
    match id {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
