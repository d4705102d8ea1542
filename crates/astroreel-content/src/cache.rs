//! In-memory content cache keyed by calendar date.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use astroreel_models::ContentItem;
use chrono::NaiveDate;

/// Cache key for a given calendar date.
pub fn cache_key(date: NaiveDate) -> String {
    format!("apod_{}", date.format("%Y-%m-%d"))
}

/// One cached value together with its fetch time.
#[derive(Debug, Clone)]
struct CacheEntry {
    item: ContentItem,
    fetched_at: Instant,
}

/// Date-keyed cache with TTL-on-read eviction.
///
/// A lookup past the TTL is treated as a miss and the entry is removed;
/// the next successful fetch overwrites it in place. At most one entry
/// per calendar day is ever inserted, so no other eviction is needed.
#[derive(Debug)]
pub struct DailyCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl DailyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Return the cached item if its age is below the TTL.
    pub fn get(&mut self, key: &str) -> Option<ContentItem> {
        match self.entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.item.clone()),
            Some(_) => {
                // Stale: treat as a miss and drop the entry.
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, item: ContentItem) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                item,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
