//! JSON API Pack - Resource wrappers and the pack engine
//!
//! This crate turns nested object graphs into flat JSON API documents:
//!
//! - [`Wrapper`] describes one resource type and its relationships
//! - [`Reference`] declares a to-one or to-many relationship
//! - [`Wrapper::pack`] produces an [`Envelope`] with primary records, their
//!   links, the `linked` side table and (optionally) link templates
//!
//! # Example
//!
//! ```
//! use jsonapi_pack::{Context, Wrapper};
//! use serde_json::json;
//!
//! let ctx = Context::new("/").shared();
//! let authors = Wrapper::new("authors", ctx.clone()).unwrap();
//! let mut posts = Wrapper::new("posts", ctx).unwrap();
//! posts.reference_one("author", &authors);
//!
//! let packed = posts
//!     .pack(&json!({"id": 1, "author": {"id": "a1", "name": "N"}}))
//!     .unwrap();
//! assert_eq!(
//!     packed.into_value(),
//!     json!({
//!         "posts": [{"id": 1, "links": {"author": "a1"}}],
//!         "linked": {"authors": [{"id": "a1", "name": "N"}]}
//!     })
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod pack;
pub mod reference;
pub mod templates;
pub mod wrapper;

// Re-export commonly used types
pub use jsonapi_format::{
    Cardinality, Context, Envelope, JsonApiError, LinkTemplate, LinkTemplates, Linked, OneOrMany,
    Options, Result, ResourceType,
};
pub use reference::Reference;
pub use wrapper::Wrapper;
