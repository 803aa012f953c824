//! LRU Cache Module
//!
//! Byte-bounded cache engine. Entries live in an index-based arena linked into
//! a recency list, with a key index pointing at arena slots, so insert,
//! promote and evict are all O(1).

use std::collections::HashMap;
use std::fmt;

use ahash::RandomState;
use tracing::{debug, trace, warn};

use crate::cache::entry::Entry;
use crate::cache::{CacheStats, SizedValue};

/// Callback invoked with the key and value of every evicted entry.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

// == LRU Cache ==
/// Key-value store that evicts least recently used entries to stay within a
/// byte budget.
///
/// Each entry is charged `key.len() + value.len()` bytes. Both [`add`] and a
/// successful [`get`] count as a use and move the entry to the most recently
/// used position.
///
/// The cache is not synchronized. Wrap it in [`SharedCache`] or another lock
/// when it is shared between threads.
///
/// [`add`]: LruCache::add
/// [`get`]: LruCache::get
/// [`SharedCache`]: crate::cache::SharedCache
pub struct LruCache<V> {
    /// Key to arena slot
    index: HashMap<String, usize, RandomState>,
    /// Entry arena; `None` marks a free slot
    slots: Vec<Option<Entry<V>>>,
    /// Most recently used slot
    head: Option<usize>,
    /// Least recently used slot
    tail: Option<usize>,
    /// Vacated slots ready for reuse
    free_slots: Vec<usize>,
    /// Byte budget, `None` when unbounded
    max_bytes: Option<usize>,
    /// Sum of the charges of all live entries
    used_bytes: usize,
    on_evicted: Option<EvictionCallback<V>>,
    stats: CacheStats,
}

impl<V: SizedValue> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `max_bytes` - Byte budget; zero or negative disables automatic eviction
    /// * `on_evicted` - Optional callback run once for each evicted entry
    pub fn new(max_bytes: i64, on_evicted: Option<EvictionCallback<V>>) -> Self {
        Self {
            index: HashMap::with_hasher(RandomState::new()),
            slots: Vec::new(),
            head: None,
            tail: None,
            free_slots: Vec::new(),
            max_bytes: usize::try_from(max_bytes).ok().filter(|&max| max > 0),
            used_bytes: 0,
            on_evicted,
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache with a byte budget and no eviction callback.
    pub fn with_max_bytes(max_bytes: i64) -> Self {
        Self::new(max_bytes, None)
    }

    /// Creates a cache that never evicts on its own.
    pub fn unbounded() -> Self {
        Self::new(0, None)
    }

    // == Add ==
    /// Inserts or replaces the value stored under `key`.
    ///
    /// The entry becomes the most recently used one. Afterwards, least recently
    /// used entries are evicted one at a time until the cache fits its budget.
    /// An entry that is larger than the whole budget evicts everything older
    /// and then itself, leaving the cache empty.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.slots[idx].as_mut() {
                let old_len = entry.value.len();
                let new_len = value.len();
                entry.value = value;
                self.used_bytes = (self.used_bytes + new_len).saturating_sub(old_len);
                trace!(key = %key, old_len, new_len, "updated cache entry");
            }
            self.move_to_front(idx);
        } else {
            let entry = Entry::new(key.clone(), value);
            let charge = entry.charge();
            let idx = self.alloc_slot(entry);
            self.push_front(idx);
            self.used_bytes += charge;
            trace!(key = %key, charge, "inserted cache entry");

            if let Some(max_bytes) = self.max_bytes {
                if charge > max_bytes {
                    warn!(
                        key = %key,
                        charge,
                        max_bytes,
                        "entry exceeds the cache budget on its own and will be evicted"
                    );
                }
            }
            self.index.insert(key, idx);
        }

        while self.is_over_budget() {
            if !self.remove_oldest() {
                break;
            }
        }
    }

    // == Get ==
    /// Returns the value stored under `key`, marking it most recently used.
    ///
    /// A missing key leaves the cache untouched.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        self.stats.record_hit();
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|entry| &entry.value)
    }

    // == Peek ==
    /// Returns the value stored under `key` without changing its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref().map(|entry| &entry.value)
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry.
    ///
    /// All bookkeeping is updated before the eviction callback runs, so the
    /// callback observes the entry as already gone. Returns false, without
    /// running the callback, when the cache is empty.
    pub fn remove_oldest(&mut self) -> bool {
        let Some(idx) = self.tail else {
            return false;
        };
        let Some(entry) = self.detach(idx) else {
            return false;
        };
        self.index.remove(&entry.key);
        self.stats.record_eviction();

        debug!(
            key = %entry.key,
            freed_bytes = entry.charge(),
            used_bytes = self.used_bytes,
            "evicted least recently used entry"
        );

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(entry.key, entry.value);
        }
        true
    }

    // == Remove ==
    /// Deletes the entry stored under `key` and returns its value.
    ///
    /// This is not an eviction: the eviction callback does not run.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.detach(idx).map(|entry| entry.value)
    }

    // == Clear ==
    /// Drops every entry without running the eviction callback.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free_slots.clear();
        self.head = None;
        self.tail = None;
        self.used_bytes = 0;
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Used Bytes ==
    /// Returns the bytes currently charged against the budget.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    // == Max Bytes ==
    /// Returns the byte budget, or `None` for an unbounded cache.
    pub fn max_bytes(&self) -> Option<usize> {
        self.max_bytes
    }

    // == Keys ==
    /// Iterates over keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            slots: &self.slots,
            cursor: self.head,
        }
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.len(), self.used_bytes);
        stats
    }

    fn is_over_budget(&self) -> bool {
        matches!(self.max_bytes, Some(max_bytes) if self.used_bytes > max_bytes)
    }

    /// Unlinks the entry in `idx`, frees its slot and releases its bytes.
    /// The caller owns removing the key from the index.
    fn detach(&mut self, idx: usize) -> Option<Entry<V>> {
        self.unlink(idx);
        let entry = self.slots[idx].take()?;
        self.free_slots.push(idx);
        self.used_bytes = self.used_bytes.saturating_sub(entry.charge());
        Some(entry)
    }

    fn alloc_slot(&mut self, entry: Entry<V>) -> usize {
        if let Some(idx) = self.free_slots.pop() {
            self.slots[idx] = Some(entry);
            idx
        } else {
            self.slots.push(Some(entry));
            self.slots.len() - 1
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;

        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = old_head;
        }

        if let Some(head_idx) = old_head {
            if let Some(head) = self.slots[head_idx].as_mut() {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_mut() {
            Some(entry) => (entry.prev.take(), entry.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = self.slots[prev_idx].as_mut() {
                    prev_entry.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_entry) = self.slots[next_idx].as_mut() {
                    next_entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Walks the recency list both ways and checks it against the index and
    /// the byte counter.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let forward: Vec<&str> = self.keys().collect();

        let mut backward = Vec::new();
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            let entry = self.slots[idx].as_ref().expect("linked slot is empty");
            backward.push(entry.key.as_str());
            cursor = entry.prev;
        }
        backward.reverse();

        assert_eq!(forward, backward, "recency links disagree");
        assert_eq!(forward.len(), self.index.len(), "list and index sizes differ");
        for key in &forward {
            let idx = self.index[*key];
            let entry = self.slots[idx].as_ref().expect("indexed slot is empty");
            assert_eq!(entry.key, *key, "index points at the wrong slot");
        }

        let charged: usize = forward
            .iter()
            .map(|key| key.len() + self.peek(key).map_or(0, SizedValue::len))
            .sum();
        assert_eq!(charged, self.used_bytes, "byte accounting drifted");
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.index.len())
            .field("used_bytes", &self.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .field("has_eviction_callback", &self.on_evicted.is_some())
            .finish()
    }
}

// == Keys Iterator ==
/// Iterator over cache keys in recency order, created by [`LruCache::keys`].
pub struct Keys<'a, V> {
    slots: &'a [Option<Entry<V>>],
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        let entry = slots[self.cursor?].as_ref()?;
        self.cursor = entry.next;
        Some(entry.key.as_str())
    }
}
