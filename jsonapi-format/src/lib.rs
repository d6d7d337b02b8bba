//! JSON API Format - Core primitives for packing object graphs
//!
//! This crate provides the building blocks shared by the packer and its front
//! ends, with no packing logic of its own. It includes:
//!
//! - Packing context (base URL, verbose links, link templates)
//! - Uniform one-or-many mapping
//! - Resource type handles and cardinality
//! - Link and link template representations
//! - The packed document envelope
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod envelope;
pub mod error;
pub mod link;
pub mod one_or_many;
pub mod types;

// Re-export commonly used types
pub use context::{Context, Options, DEFAULT_BASE_URL};
pub use envelope::{Envelope, LinkTemplates, Linked, Record};
pub use error::{JsonApiError, Result};
pub use link::{Link, LinkTemplate, ResourceLink};
pub use one_or_many::OneOrMany;
pub use types::{json_type_name, Cardinality, ResourceType};
