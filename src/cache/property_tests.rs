//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model.

use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{ByteBuffer, LruCache};

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,3}"
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..24)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Add { key: String, value: Vec<u8> },
    Get { key: String },
    RemoveOldest,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Add { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => Just(CacheOp::RemoveOldest),
    ]
}

// == Reference Model ==
/// Vector-backed LRU, most recently used first.
#[derive(Default)]
struct Model {
    order: Vec<(String, Vec<u8>)>,
    max_bytes: usize,
}

impl Model {
    fn used_bytes(&self) -> usize {
        self.order.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn touch(&mut self, key: &str) -> Option<Vec<u8>> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        let item = self.order.remove(pos);
        let value = item.1.clone();
        self.order.insert(0, item);
        Some(value)
    }

    fn remove_oldest(&mut self, evicted: &mut Vec<String>) {
        if let Some((key, _)) = self.order.pop() {
            evicted.push(key);
        }
    }

    fn add(&mut self, key: String, value: Vec<u8>, evicted: &mut Vec<String>) {
        if let Some(pos) = self.order.iter().position(|(k, _)| *k == key) {
            self.order.remove(pos);
        }
        self.order.insert(0, (key, value));
        while self.max_bytes > 0 && self.used_bytes() > self.max_bytes && !self.order.is_empty() {
            self.remove_oldest(evicted);
        }
    }
}

fn recording_cache(max_bytes: usize) -> (LruCache<ByteBuffer>, Arc<Mutex<Vec<String>>>) {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = evicted.clone();
    let cache = LruCache::new(
        max_bytes as i64,
        Some(Box::new(move |key: String, _value: ByteBuffer| {
            sink.lock().push(key);
        })),
    );
    (cache, evicted)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // After every operation the cache matches the model: same keys in the
    // same recency order, same bytes, same eviction sequence.
    #[test]
    fn prop_matches_reference_model(
        max_bytes in 0usize..64,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let (mut cache, evicted) = recording_cache(max_bytes);
        let mut model = Model { max_bytes, ..Model::default() };
        let mut model_evicted = Vec::new();

        for op in ops {
            match op {
                CacheOp::Add { key, value } => {
                    cache.add(key.clone(), ByteBuffer::from(value.clone()));
                    model.add(key, value, &mut model_evicted);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key).map(ByteBuffer::to_bytes);
                    prop_assert_eq!(got, model.touch(&key));
                }
                CacheOp::RemoveOldest => {
                    let removed = cache.remove_oldest();
                    prop_assert_eq!(removed, !model.order.is_empty());
                    model.remove_oldest(&mut model_evicted);
                }
            }

            cache.assert_consistent();
            let keys: Vec<&str> = cache.keys().collect();
            let model_keys: Vec<&str> = model.order.iter().map(|(k, _)| k.as_str()).collect();
            prop_assert_eq!(keys, model_keys);
            prop_assert_eq!(cache.used_bytes(), model.used_bytes());
            prop_assert_eq!(&*evicted.lock(), &model_evicted);
        }
    }

    // With a positive budget, used bytes never exceed it once add returns.
    #[test]
    fn prop_budget_enforced(
        max_bytes in 1usize..128,
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..100)
    ) {
        let mut cache = LruCache::with_max_bytes(max_bytes as i64);

        for (key, value) in entries {
            cache.add(key, ByteBuffer::from(value));
            prop_assert!(
                cache.used_bytes() <= max_bytes,
                "used {} exceeds budget {}",
                cache.used_bytes(),
                max_bytes
            );
        }
    }

    // Adding the same key twice keeps one entry sized by the second value.
    #[test]
    fn prop_update_replaces(
        key in key_strategy(),
        first in value_strategy(),
        second in value_strategy()
    ) {
        let mut cache = LruCache::unbounded();

        cache.add(key.clone(), ByteBuffer::from(first));
        cache.add(key.clone(), ByteBuffer::from(second.clone()));

        prop_assert_eq!(cache.len(), 1);
        prop_assert_eq!(cache.used_bytes(), key.len() + second.len());
        prop_assert_eq!(cache.get(&key).map(ByteBuffer::to_bytes), Some(second));
    }

    // Mutating a copy never changes what the buffer reports.
    #[test]
    fn prop_byte_buffer_copies(bytes in value_strategy(), noise in any::<u8>()) {
        let buf = ByteBuffer::from(bytes.clone());

        let mut copy = buf.to_bytes();
        for b in copy.iter_mut() {
            *b = b.wrapping_add(noise).wrapping_add(1);
        }
        copy.push(noise);

        prop_assert_eq!(buf.len(), bytes.len());
        prop_assert_eq!(buf.to_bytes(), bytes.clone());
        prop_assert_eq!(buf.to_text(), String::from_utf8_lossy(&bytes).into_owned());
    }
}
