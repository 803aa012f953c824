//! Configuration Module
//!
//! Handles loading cache configuration from environment variables or from a
//! host application's own config files.

use std::env;

use serde::Deserialize;
use tracing::warn;

use crate::cache::{EvictionCallback, LruCache, SizedValue};
use crate::error::{CacheError, Result};

/// Environment variable holding the byte budget.
pub const MAX_BYTES_VAR: &str = "CACHE_MAX_BYTES";

/// Cache configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Byte budget for keys plus values; zero or negative means unbounded
    pub max_bytes: i64,
}

impl CacheConfig {
    /// Creates a config with the given byte budget.
    pub fn new(max_bytes: i64) -> Self {
        Self { max_bytes }
    }

    /// Loads the config from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_BYTES` - Byte budget (default: 0, unbounded)
    ///
    /// Missing or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|err| {
            warn!("{}; falling back to defaults", err);
            Self::default()
        })
    }

    /// Loads the config from environment variables, rejecting unparsable
    /// values instead of falling back.
    pub fn try_from_env() -> Result<Self> {
        let max_bytes = match env::var(MAX_BYTES_VAR) {
            Ok(raw) => parse_var(MAX_BYTES_VAR, &raw)?,
            Err(_) => Self::default().max_bytes,
        };
        Ok(Self { max_bytes })
    }

    /// Builds an empty cache with this budget.
    pub fn build<V: SizedValue>(&self, on_evicted: Option<EvictionCallback<V>>) -> LruCache<V> {
        LruCache::new(self.max_bytes, on_evicted)
    }
}

fn parse_var(var: &str, raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| CacheError::InvalidConfig {
        var: var.to_string(),
        value: raw.to_string(),
    })
}
