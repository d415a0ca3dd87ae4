// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory cache of server data keyed by logical query identity.
//!
//! Shared across requests. Mutations update or evict entries after the
//! backend confirms them; nothing is written optimistically. Entries older than
//! the TTL read as misses, and the cache never holds more than its capacity.

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Logical identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Profile of the given user id
    UserProfile(String),
    /// Details of the given story id
    Story(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::UserProfile(id) => write!(f, "userProfile/{}", id),
            QueryKey::Story(id) => write!(f, "story/{}", id),
        }
    }
}

struct CachedValue {
    inserted: Instant,
    value: serde_json::Value,
}

/// Shared query cache.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<DashMap<QueryKey, CachedValue>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_policy(DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_policy(ttl, DEFAULT_CAPACITY)
    }

    pub fn with_policy(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Cached value for `key`. An entry that has expired or no longer decodes
    /// into `T` is dropped and reported as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let (inserted, value) = {
            let entry = self.entries.get(key)?;
            (entry.inserted, entry.value.clone())
        };

        if inserted.elapsed() >= self.ttl {
            tracing::debug!(key = %key, "Query cache entry expired");
            self.entries.remove_if(key, |_, cached| cached.inserted == inserted);
            return None;
        }

        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Evicting undecodable cache entry");
                self.entries.remove(key);
                None
            }
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set<T: Serialize>(&self, key: QueryKey, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to cache value");
                return;
            }
        };

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.make_room();
        }

        tracing::debug!(key = %key, "Query cache updated");
        self.entries.insert(
            key,
            CachedValue {
                inserted: Instant::now(),
                value,
            },
        );
    }

    /// Drop expired entries; if the cache is still full, evict the oldest.
    fn make_room(&self) {
        self.entries.retain(|_, cached| cached.inserted.elapsed() < self.ttl);
        if self.entries.len() < self.capacity {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            tracing::debug!(key = %key, "Query cache full, evicting oldest entry");
            self.entries.remove(&key);
        }
    }

    /// Evict `key`. Returns whether an entry was present.
    pub fn remove(&self, key: &QueryKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            tracing::debug!(key = %key, "Query cache entry evicted");
        }
        removed
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
