#![deny(missing_docs)]

//! # Type Registry
//!
//! Run-scoped bookkeeping for the model generator:
//! - [`TypeRegistry`]: names already claimed, in claim order. First writer wins.
//! - [`PendingQueue`]: schemas discovered mid-resolution, drained FIFO. Entries are
//!   checked against the registry when popped, so stale duplicates are allowed in.

use crate::oas::schema::SchemaNode;
use indexmap::IndexSet;
use std::collections::VecDeque;

/// Ordered set of type names generated (or being generated) in this run.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    names: IndexSet<String>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name`. Returns `false` if someone claimed it first.
    pub fn claim(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    /// Gives a name back after its schema failed to generate.
    pub fn release(&mut self, name: &str) {
        self.names.shift_remove(name);
    }

    /// Whether `name` is taken.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of claimed names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been claimed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Claimed names in claim order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// A schema waiting for its own named type.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSchema {
    /// Proposed key; the type name is derived from it.
    pub key: String,
    /// The schema to generate.
    pub schema: SchemaNode,
}

/// A `oneOf` group waiting to be derived.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionGroup {
    /// The property owning the union.
    pub owner: String,
    /// Variant schemas in declared order.
    pub variants: Vec<SchemaNode>,
}

/// FIFO of pending schemas.
#[derive(Debug, Default, Clone)]
pub struct PendingQueue {
    queue: VecDeque<PendingSchema>,
}

impl PendingQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a schema.
    pub fn push(&mut self, pending: PendingSchema) {
        self.queue.push_back(pending);
    }

    /// Removes the oldest schema.
    pub fn pop(&mut self) -> Option<PendingSchema> {
        self.queue.pop_front()
    }

    /// Queue length.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is drained.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Extend<PendingSchema> for PendingQueue {
    fn extend<T: IntoIterator<Item = PendingSchema>>(&mut self, iter: T) {
        self.queue.extend(iter);
    }
}
