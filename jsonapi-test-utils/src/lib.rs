//! JSON API Test Utilities
//!
//! This crate provides shared testing utilities and fixtures for the packer crates.

use serde_json::{Map, Value};

/// Builder for creating test records with common patterns
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    /// Create a new record builder
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Start a record with a numeric `id`
    pub fn with_id(id: i64) -> Self {
        Self::new().int("id", id)
    }

    /// Start a record with a string `id`
    pub fn with_str_id(id: &str) -> Self {
        Self::new().string("id", id)
    }

    /// Add a field with a string value
    pub fn string(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a field with an integer value
    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a field with a boolean value
    pub fn bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Embed a related record (to-one)
    pub fn related(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Embed related records (to-many)
    pub fn related_many(mut self, key: &str, values: Vec<Value>) -> Self {
        self.fields.insert(key.to_string(), Value::Array(values));
        self
    }

    /// Build the record
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Blog-shaped fixtures: posts with an `author` (to-one) and `comments` (to-many)
pub struct BlogData;

impl BlogData {
    /// An author record
    pub fn author(id: &str, name: &str) -> Value {
        RecordBuilder::with_str_id(id).string("name", name).build()
    }

    /// A comment record
    pub fn comment(id: i64, text: &str) -> Value {
        RecordBuilder::with_id(id).string("text", text).build()
    }

    /// A post without relationships
    pub fn plain_post(id: i64, title: &str) -> Value {
        RecordBuilder::with_id(id).string("title", title).build()
    }

    /// A post embedding its author
    pub fn post_with_author(id: i64, title: &str, author: Value) -> Value {
        RecordBuilder::with_id(id)
            .string("title", title)
            .related("author", author)
            .build()
    }

    /// A post embedding its author and comments
    pub fn full_post(id: i64, title: &str, author: Value, comments: Vec<Value>) -> Value {
        RecordBuilder::with_id(id)
            .string("title", title)
            .related("author", author)
            .related_many("comments", comments)
            .build()
    }

    /// Generate `count` posts, each with an author (10 distinct) and
    /// `comments_per_post` comments with globally unique ids
    pub fn large_post_set(count: usize, comments_per_post: usize) -> Vec<Value> {
        let mut posts = Vec::with_capacity(count);
        let mut next_comment = 0i64;

        for i in 0..count {
            let author_idx = i % 10;
            let comments = (0..comments_per_post)
                .map(|_| {
                    next_comment += 1;
                    Self::comment(next_comment, &format!("Comment {}", next_comment))
                })
                .collect();

            posts.push(Self::full_post(
                i as i64,
                &format!("Post number {}", i),
                Self::author(&format!("author_{}", author_idx), &format!("Author {}", author_idx)),
                comments,
            ));
        }

        posts
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use serde_json::Value;

    /// Assert that two JSON values are semantically equal (ignoring formatting)
    pub fn assert_json_equal(actual: &Value, expected: &Value, context: &str) {
        if actual != expected {
            panic!(
                "JSON assertion failed in {}:\nExpected: {}\nActual: {}",
                context,
                serde_json::to_string_pretty(expected).unwrap(),
                serde_json::to_string_pretty(actual).unwrap()
            );
        }
    }

    /// Assert that a document has exactly the given top-level keys
    pub fn assert_top_level_keys(doc: &Value, expected: &[&str]) {
        let mut keys: Vec<&str> = doc
            .as_object()
            .expect("document must be an object")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        let mut expected = expected.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected, "unexpected top-level keys");
    }
}
