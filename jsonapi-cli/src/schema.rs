//! Resource schema loading
//!
//! A schema file declares the packing options and every resource type with
//! its relationships:
//!
//! ```toml
//! [options]
//! baseUrl = "/api/"
//! urlTemplates = true
//!
//! [resources.posts]
//! references = [
//!   { ref = "author", resource = "authors" },
//!   { ref = "comments", resource = "comments", many = true },
//! ]
//!
//! [resources.authors]
//! [resources.comments]
//! ```

use ahash::AHashMap;
use jsonapi_format::{Cardinality, Context, JsonApiError, Options};
use jsonapi_pack::{Reference, Wrapper};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema file could not be read
    #[error("Failed to read schema '{}': {source}", .path.display())]
    Read {
        /// Path of the schema file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Schema is not valid TOML or has unexpected fields
    #[error("Invalid schema: {0}")]
    Parse(#[from] toml::de::Error),

    /// A reference points at a resource that is not declared
    #[error(
        "Resource '{resource}' references unknown resource '{target}' via '{reference}'.\n\
         \n\
         Declare it with an empty table: [resources.{target}]"
    )]
    UnknownTarget {
        /// Declaring resource
        resource: String,
        /// Reference property
        reference: String,
        /// Missing resource type
        target: String,
    },

    /// The requested resource is not declared
    #[error("Unknown resource '{name}'. Declared resources: {available}")]
    UnknownResource {
        /// Requested resource type
        name: String,
        /// Comma-separated declared resource types
        available: String,
    },

    /// A declared resource name is rejected by the packer
    #[error(transparent)]
    JsonApi(#[from] JsonApiError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    options: Options,
    #[serde(default)]
    resources: BTreeMap<String, ResourceDecl>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResourceDecl {
    #[serde(default)]
    references: Vec<ReferenceDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReferenceDecl {
    #[serde(rename = "ref")]
    name: String,
    resource: String,
    #[serde(default)]
    many: bool,
}

/// Command-line overrides applied on top of the schema's options
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    /// Replace `baseUrl`
    pub base_url: Option<String>,
    /// Force verbose links on
    pub verbose: bool,
    /// Force link templates on
    pub url_templates: bool,
}

impl OptionOverrides {
    fn apply(&self, options: &mut Options) {
        if let Some(base_url) = &self.base_url {
            options.base_url = base_url.clone();
        }
        options.verbose |= self.verbose;
        options.url_templates |= self.url_templates;
    }
}

/// Every declared resource, wired to one shared context
#[derive(Debug)]
pub struct Schema {
    context: Arc<Context>,
    wrappers: AHashMap<String, Wrapper>,
}

impl Schema {
    /// Load a schema file
    pub fn load(path: &Path, overrides: &OptionOverrides) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, overrides)
    }

    /// Parse a schema from TOML text
    pub fn from_toml_str(text: &str, overrides: &OptionOverrides) -> Result<Self, SchemaError> {
        let SchemaFile {
            mut options,
            resources,
        } = toml::from_str(text)?;
        overrides.apply(&mut options);
        let context = Context::from_options(options).shared();

        let mut wrappers = AHashMap::with_capacity(resources.len());
        for name in resources.keys() {
            wrappers.insert(name.clone(), Wrapper::new(name, context.clone())?);
        }

        for (name, decl) in &resources {
            for reference in &decl.references {
                let target = wrappers
                    .get(&reference.resource)
                    .map(|w| w.resource_type().clone())
                    .ok_or_else(|| SchemaError::UnknownTarget {
                        resource: name.clone(),
                        reference: reference.name.clone(),
                        target: reference.resource.clone(),
                    })?;
                let cardinality = if reference.many {
                    Cardinality::Many
                } else {
                    Cardinality::One
                };
                if let Some(wrapper) = wrappers.get_mut(name) {
                    wrapper.reference(Reference::new(reference.name.clone(), target, cardinality));
                }
            }
        }

        tracing::debug!(resources = wrappers.len(), "schema loaded");
        Ok(Self { context, wrappers })
    }

    /// Shared packing context
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Wrapper for a declared resource type
    pub fn wrapper(&self, name: &str) -> Result<&Wrapper, SchemaError> {
        self.wrappers
            .get(name)
            .ok_or_else(|| SchemaError::UnknownResource {
                name: name.to_string(),
                available: self.resource_names().join(", "),
            })
    }

    /// Declared resource types, sorted
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.wrappers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Declared wrappers, sorted by type
    pub fn wrappers(&self) -> Vec<&Wrapper> {
        self.resource_names()
            .into_iter()
            .filter_map(|name| self.wrappers.get(name))
            .collect()
    }
}
