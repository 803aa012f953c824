//! Cache Entry Module
//!
//! Defines the arena node that holds one key-value pair and its recency links.

use crate::cache::SizedValue;

// == Cache Entry ==
/// A key-value pair stored in one slot of the recency list.
///
/// `prev` points toward the most recently used end, `next` toward the least
/// recently used end. Both are slot indices into the owning arena.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    /// The key, immutable once the entry exists
    pub key: String,
    /// The stored value
    pub value: V,
    /// Slot of the next more recently used entry
    pub prev: Option<usize>,
    /// Slot of the next less recently used entry
    pub next: Option<usize>,
}

impl<V: SizedValue> Entry<V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: String, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    // == Charge ==
    /// Returns the number of bytes this entry counts against the budget.
    pub fn charge(&self) -> usize {
        self.key.len() + self.value.len()
    }
}
