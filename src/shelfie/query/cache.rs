use crate::config::ShelfieConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Identifies one cached read, e.g. `books/12` or `reviews/book/12/can-review`.
///
/// Prefix matching works on whole segments: `books/1` is not a prefix of
/// `books/12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: ToString,
    {
        Self(parts.into_iter().map(|p| p.to_string()).collect())
    }

    pub fn child(&self, part: impl ToString) -> Self {
        let mut parts = self.0.clone();
        parts.push(part.to_string());
        Self(parts)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: Value,
    pub updated_at: DateTime<Utc>,
    /// Marked by a mutation; the next read refetches.
    pub invalidated: bool,
}

/// Freshness and retry rules shared by every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    pub stale_after: Duration,
    pub retries: u32,
    /// Base pause between attempts; attempt `n` waits `n * retry_delay`.
    pub retry_delay: Duration,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(300),
            retries: 1,
            retry_delay: Duration::from_millis(300),
        }
    }
}

impl From<&ShelfieConfig> for QueryPolicy {
    fn from(config: &ShelfieConfig) -> Self {
        Self {
            stale_after: config.stale_after(),
            retries: config.retries,
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    key: QueryKey,
    #[serde(flatten)]
    entry: CacheEntry,
}

/// Keyed cache of read results.
///
/// Values are kept as JSON so one cache holds every response type. Last
/// write wins; nothing is sequenced or locked.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    policy: QueryPolicy,
}

impl QueryCache {
    pub fn new(policy: QueryPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> QueryPolicy {
        self.policy
    }

    /// Return the cached value if fresh, otherwise run `fetcher` (retrying
    /// network and server failures) and cache what it returns. Errors are
    /// never cached.
    pub fn fetch<V, F>(&mut self, key: &QueryKey, mut fetcher: F) -> Result<V>
    where
        V: Serialize + DeserializeOwned,
        F: FnMut() -> Result<V>,
    {
        if let Some(entry) = self.entries.get(key) {
            if self.is_fresh(entry) {
                match serde_json::from_value(entry.value.clone()) {
                    Ok(value) => {
                        tracing::debug!(key = %key, "cache hit");
                        return Ok(value);
                    }
                    Err(e) => tracing::warn!(key = %key, error = %e, "cached value unreadable"),
                }
            }
        }

        tracing::debug!(key = %key, "cache miss");
        let mut attempt = 0;
        let value = loop {
            match fetcher() {
                Ok(value) => break value,
                Err(e) if e.is_retryable() && attempt < self.policy.retries => {
                    attempt += 1;
                    tracing::debug!(key = %key, attempt, error = %e, "retrying");
                    std::thread::sleep(self.policy.retry_delay * attempt);
                }
                Err(e) => return Err(e),
            }
        };

        self.set(key, &value)?;
        Ok(value)
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        if entry.invalidated {
            return false;
        }
        let age = Utc::now().signed_duration_since(entry.updated_at);
        match age.to_std() {
            Ok(age) => age < self.policy.stale_after,
            // Timestamp in the future (clock moved back): treat as fresh.
            Err(_) => true,
        }
    }

    /// Cached value regardless of freshness.
    pub fn get<V: DeserializeOwned>(&self, key: &QueryKey) -> Option<V> {
        self.entries
            .get(key)
            .and_then(|e| serde_json::from_value(e.value.clone()).ok())
    }

    /// Store a value as fresh. Used after fetches and for optimistic patches.
    pub fn set<V: Serialize>(&mut self, key: &QueryKey, value: &V) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                updated_at: Utc::now(),
                invalidated: false,
            },
        );
        Ok(())
    }

    /// Patch a cached value in place. Returns false when nothing was cached.
    pub fn update<V, F>(&mut self, key: &QueryKey, patch: F) -> Result<bool>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce(&mut V),
    {
        let Some(mut value) = self.get::<V>(key) else {
            return Ok(false);
        };
        patch(&mut value);
        self.set(key, &value)?;
        Ok(true)
    }

    pub fn snapshot(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    /// Put back what [`QueryCache::snapshot`] returned; `None` removes the key.
    pub fn restore(&mut self, key: &QueryKey, snapshot: Option<CacheEntry>) {
        match snapshot {
            Some(entry) => {
                self.entries.insert(key.clone(), entry);
            }
            None => {
                self.entries.remove(key);
            }
        }
    }

    /// Mark every entry under `prefix` stale. Returns how many were marked.
    pub fn invalidate(&mut self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                count += 1;
            }
        }
        tracing::debug!(prefix = %prefix, count, "invalidated");
        count
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).map_or(true, |e| !self.is_fresh(e))
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &QueryKey) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a cache file; a missing or unreadable file gives an empty cache.
    pub fn load<P: AsRef<Path>>(path: P, policy: QueryPolicy) -> Self {
        let path = path.as_ref();
        let mut cache = Self::new(policy);
        let Ok(content) = fs::read_to_string(path) else {
            return cache;
        };
        match serde_json::from_str::<Vec<StoredEntry>>(&content) {
            Ok(stored) => {
                cache.entries = stored.into_iter().map(|s| (s.key, s.entry)).collect();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable cache");
            }
        }
        cache
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut stored: Vec<StoredEntry> = self
            .entries
            .iter()
            .map(|(key, entry)| StoredEntry {
                key: key.clone(),
                entry: entry.clone(),
            })
            .collect();
        stored.sort_by(|a, b| a.key.cmp(&b.key));
        fs::write(path, serde_json::to_string(&stored)?)?;
        Ok(())
    }
}
