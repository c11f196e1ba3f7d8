use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::error::EngineError;

/// Default expiry for volatile per-teacher reference data.
pub const DEFAULT_TTL_SECS: i64 = 300;
/// Expiry for near-static global lookups such as the class roster.
pub const ROSTER_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct CacheSlot<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Time-boxed key/value cache for read-mostly reference data. Expiry is
/// checked lazily on read; there is no background eviction and nothing is
/// persisted across sessions. Writes always overwrite and reset expiry.
#[derive(Debug)]
pub struct ReferenceCache<V> {
    entries: HashMap<String, CacheSlot<V>>,
    default_ttl: Duration,
}

impl<V: Clone> ReferenceCache<V> {
    pub fn new() -> Self {
        Self::with_default_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
        }
    }

    /// Absent and expired entries are both misses; an expired entry is
    /// dropped by the read that notices it.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<V> {
        match self.entries.get(key) {
            Some(slot) if now < slot.expires_at => Some(slot.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.default_ttl;
        self.set_with_ttl(key, value, ttl);
    }

    pub fn set_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Utc::now());
    }

    fn set_at(&mut self, key: impl Into<String>, value: V, ttl: Duration, now: DateTime<Utc>) {
        self.entries.insert(
            key.into(),
            CacheSlot {
                value,
                expires_at: now + ttl,
            },
        );
    }

    /// Removes the entry immediately so the next read misses.
    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Cache-first read: a miss runs `fetch`, stores the result under the
    /// default TTL, and returns it. A failed fetch is a load error and
    /// leaves the cache untouched.
    pub fn get_or_fetch<F>(&mut self, key: &str, fetch: F) -> Result<V, EngineError>
    where
        F: FnOnce() -> anyhow::Result<V>,
    {
        let ttl = self.default_ttl;
        self.get_or_fetch_with_ttl(key, ttl, fetch)
    }

    pub fn get_or_fetch_with_ttl<F>(
        &mut self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<V, EngineError>
    where
        F: FnOnce() -> anyhow::Result<V>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = fetch().map_err(EngineError::Load)?;
        self.set_with_ttl(key.to_string(), value.clone(), ttl);
        Ok(value)
    }
}

impl<V: Clone> Default for ReferenceCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
