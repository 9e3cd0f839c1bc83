//! In-memory, per-city snapshot cache with a fixed freshness window.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::city::City;
use crate::types::{CacheEntry, WeatherSnapshot};

/// Default freshness window.
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Holds at most one entry per city. Entries are overwritten, never removed;
/// the closed city set bounds the size.
#[derive(Debug)]
pub struct WeatherCache {
    entries: RwLock<HashMap<City, CacheEntry>>,
    ttl: Duration,
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// The cached snapshot for `city` if it was fetched less than one TTL before `now`.
    pub fn fresh(&self, city: City, now: DateTime<Utc>) -> Option<WeatherSnapshot> {
        let entries = self.entries.read();
        let entry = entries.get(&city)?;
        if self.is_fresh(entry, now) {
            Some(entry.snapshot.clone())
        } else {
            None
        }
    }

    /// Replace the entry for `city`.
    pub fn store(&self, city: City, snapshot: WeatherSnapshot, fetched_at: DateTime<Utc>) {
        self.entries.write().insert(
            city,
            CacheEntry {
                snapshot,
                fetched_at,
            },
        );
    }

    /// The raw entry for `city`, fresh or not.
    pub fn entry(&self, city: City) -> Option<CacheEntry> {
        self.entries.read().get(&city).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        // A clock that went backwards counts as age zero.
        let age = (now - entry.fetched_at).to_std().unwrap_or(Duration::ZERO);
        age < self.ttl
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}
