//! Shared Cache Module
//!
//! Thread-safe handle around [`LruCache`] for callers that share one cache.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheStats, LruCache, SizedValue};

// == Shared Cache ==
/// Cloneable, lock-protected handle to an [`LruCache`].
///
/// Every operation holds the lock for its whole duration, including any
/// eviction callbacks it triggers. A callback must therefore not call back
/// into the same handle, or it will deadlock.
pub struct SharedCache<V> {
    inner: Arc<Mutex<LruCache<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: SizedValue> SharedCache<V> {
    // == Constructor ==
    /// Wraps an existing cache.
    pub fn new(cache: LruCache<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    // == Add ==
    /// See [`LruCache::add`].
    pub fn add(&self, key: impl Into<String>, value: V) {
        self.inner.lock().add(key, value);
    }

    // == Get ==
    /// Returns a clone of the value under `key`, marking it most recently used.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    // == Remove Oldest ==
    /// See [`LruCache::remove_oldest`].
    pub fn remove_oldest(&self) -> bool {
        self.inner.lock().remove_oldest()
    }

    // == Remove ==
    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.lock().remove(key)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    // == Used Bytes ==
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().used_bytes()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    // == With Cache ==
    /// Runs `f` with exclusive access to the underlying cache, so several
    /// operations can happen under one lock acquisition.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut LruCache<V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<V: SizedValue> From<LruCache<V>> for SharedCache<V> {
    fn from(cache: LruCache<V>) -> Self {
        Self::new(cache)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ByteBuffer;
    use std::thread;

    #[test]
    fn test_shared_add_and_get() {
        let cache = SharedCache::new(LruCache::unbounded());

        cache.add("key", ByteBuffer::from("value"));

        assert_eq!(cache.get("key"), Some(ByteBuffer::from("value")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), 8);
    }

    #[test]
    fn test_shared_clones_see_same_cache() {
        let cache = SharedCache::new(LruCache::unbounded());
        let other = cache.clone();

        other.add("key", ByteBuffer::from("v"));

        assert!(cache.get("key").is_some());
        assert_eq!(other.remove("key"), Some(ByteBuffer::from("v")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_with_cache_batches_operations() {
        let cache: SharedCache<ByteBuffer> = LruCache::with_max_bytes(100).into();

        let keys = cache.with_cache(|inner| {
            inner.add("a", ByteBuffer::from("1"));
            inner.add("b", ByteBuffer::from("2"));
            inner.keys().map(str::to_string).collect::<Vec<_>>()
        });

        assert_eq!(keys, vec!["b", "a"]);
        assert!(cache.remove_oldest());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_shared_concurrent_adds_respect_budget() {
        let cache: SharedCache<ByteBuffer> = LruCache::with_max_bytes(256).into();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        cache.add(format!("t{t}-k{i}"), ByteBuffer::from(vec![0u8; 8]));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.used_bytes() <= 256);
        cache.with_cache(|inner| inner.assert_consistent());
        assert_eq!(cache.stats().evictions, 800 - cache.len() as u64);
    }
}
