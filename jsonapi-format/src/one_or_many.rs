//! Uniform mapping over a single value or a sequence of values
//!
//! `OneOrMany` lets to-one and to-many relationships share one code path while
//! keeping their shape: mapping a `Many` yields a `Many`, mapping a `One`
//! yields a `One` (never a one-element sequence).

use serde_json::Value;

/// A single item or an ordered sequence of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    /// Scalar payload
    One(T),
    /// Sequence payload
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Whether the payload is a sequence
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    /// Number of items (1 for `One`)
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    /// True only for an empty sequence
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f(item, index)` to every item, preserving the shape
    pub fn map<U, F>(self, mut f: F) -> OneOrMany<U>
    where
        F: FnMut(T, usize) -> U,
    {
        match self {
            OneOrMany::One(item) => OneOrMany::One(f(item, 0)),
            OneOrMany::Many(items) => OneOrMany::Many(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| f(item, idx))
                    .collect(),
            ),
        }
    }

    /// Fallible [`map`](Self::map); stops at the first error
    pub fn try_map<U, E, F>(self, mut f: F) -> Result<OneOrMany<U>, E>
    where
        F: FnMut(T, usize) -> Result<U, E>,
    {
        match self {
            OneOrMany::One(item) => f(item, 0).map(OneOrMany::One),
            OneOrMany::Many(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| f(item, idx))
                .collect::<Result<Vec<_>, E>>()
                .map(OneOrMany::Many),
        }
    }

    /// Visit every item with its index
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T, usize),
    {
        match self {
            OneOrMany::One(item) => f(item, 0),
            OneOrMany::Many(items) => {
                for (idx, item) in items.iter().enumerate() {
                    f(item, idx);
                }
            }
        }
    }

    /// Borrowing view with the same shape
    pub fn as_ref(&self) -> OneOrMany<&T> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(item),
            OneOrMany::Many(items) => OneOrMany::Many(items.iter().collect()),
        }
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }

    /// Flatten into a vector (a `One` becomes a one-element vector)
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    /// The scalar, or the first element of a sequence
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.first(),
        }
    }
}

impl OneOrMany<Value> {
    /// Arrays become `Many`, everything else `One`
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => OneOrMany::Many(items),
            other => OneOrMany::One(other),
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

impl<T: Into<Value>> From<OneOrMany<T>> for Value {
    fn from(items: OneOrMany<T>) -> Self {
        match items {
            OneOrMany::One(item) => item.into(),
            OneOrMany::Many(items) => Value::Array(items.into_iter().map(Into::into).collect()),
        }
    }
}
