// ── TTL cache ──
//
// Freshness is judged lazily on read from wall-clock time; there is no
// background sweep. A stale entry is dropped by the read that finds it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

/// One cached payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Arc<Value>,
    pub stored_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    /// Age at `now`; zero if the clock went backwards.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.stored_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Fresh iff `now - stored_at < ttl`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.age_at(now) < self.ttl
    }
}

/// Per-entry figures reported by [`CacheStore::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryStats {
    pub widget_id: String,
    pub age_ms: u64,
    pub ttl_ms: u64,
    /// Length of the payload serialized as JSON.
    pub size_bytes: usize,
    pub fresh: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_age_ms: u64,
    pub entries: Vec<CacheEntryStats>,
}

/// Keyed, TTL-bounded storage of the last good payload per widget.
///
/// Callers get a cloned [`CacheEntry`] whose `data` is a shared,
/// immutable `Arc`; nothing outside the store can modify a stored value.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: DashMap<String, CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh entry for `widget_id`, if any.
    pub fn get(&self, widget_id: &str) -> Option<CacheEntry> {
        self.get_at(widget_id, Utc::now())
    }

    /// [`get`](Self::get) evaluated at an explicit instant.
    pub fn get_at(&self, widget_id: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entry = self.entries.get(widget_id)?.value().clone();
        if entry.is_fresh_at(now) {
            return Some(entry);
        }
        // Re-check under the write lock so a concurrent `set` is not lost.
        self.entries
            .remove_if(widget_id, |_, e| !e.is_fresh_at(now));
        None
    }

    /// Store (or overwrite) the payload for `widget_id`.
    pub fn set(&self, widget_id: &str, data: Arc<Value>, ttl: Duration) {
        self.set_at(widget_id, data, ttl, Utc::now());
    }

    pub fn set_at(&self, widget_id: &str, data: Arc<Value>, ttl: Duration, now: DateTime<Utc>) {
        self.entries.insert(
            widget_id.to_owned(),
            CacheEntry {
                data,
                stored_at: now,
                ttl,
            },
        );
    }

    /// Drop one entry. Returns `true` if it existed.
    pub fn invalidate(&self, widget_id: &str) -> bool {
        self.entries.remove(widget_id).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every stored entry, stale ones included, sorted by id.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let mut entries: Vec<CacheEntryStats> = self
            .entries
            .iter()
            .map(|r| {
                let entry = r.value();
                CacheEntryStats {
                    widget_id: r.key().clone(),
                    age_ms: millis(entry.age_at(now)),
                    ttl_ms: millis(entry.ttl),
                    size_bytes: serde_json::to_vec(entry.data.as_ref()).map_or(0, |b| b.len()),
                    fresh: entry.is_fresh_at(now),
                }
            })
            .collect();
        entries.sort_by(|a, b| a.widget_id.cmp(&b.widget_id));

        CacheStats {
            size: entries.len(),
            max_age_ms: entries.iter().map(|e| e.age_ms).max().unwrap_or(0),
            entries,
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
