//! Byte LRU - A byte-bounded in-memory cache
//!
//! Stores sized values under string keys, evicting the least recently used
//! entry whenever the configured byte budget is exceeded.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{ByteBuffer, CacheStats, EvictionCallback, LruCache, SharedCache, SizedValue};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
