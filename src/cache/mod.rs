//! Cache Module
//!
//! Provides the byte-bounded LRU engine and the value types it stores.

mod byte_buffer;
mod entry;
mod lru;
mod shared;
mod stats;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byte_buffer::ByteBuffer;
pub use lru::{EvictionCallback, Keys, LruCache};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use value::SizedValue;
