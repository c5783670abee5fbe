use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contracts::{CacheError, CounterSnapshot, DEFAULT_COUNT};

/// Pseudo-random token identifying one browser session. Not a verified user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-side mirror of the like counter, used when the remote store is
/// unreachable. Values incremented here are never pushed back upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCounterCache {
    /// Last known counter value; `None` until something was mirrored.
    #[serde(default)]
    count: Option<i64>,
    /// Identities that already liked.
    #[serde(default)]
    liked: HashSet<Identity>,
}

impl LocalCounterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a cache from a JSON file. A missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| CacheError::Io(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents).map_err(|e| {
            CacheError::Serialization(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Writes the cache to a JSON file, replacing any previous contents.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        fs::write(path, contents)
            .map_err(|e| CacheError::Io(format!("failed to write {}: {}", path.display(), e)))
    }

    pub fn count(&self) -> Option<i64> {
        self.count
    }

    pub fn has_liked(&self, identity: &Identity) -> bool {
        self.liked.contains(identity)
    }

    /// Mirrors a value read from or written to the remote store.
    pub fn remember(&mut self, count: i64) {
        self.count = Some(count);
    }

    pub fn mark_liked(&mut self, identity: Identity) {
        self.liked.insert(identity);
    }

    /// Increments the cached value by one (starting from the default when
    /// nothing is cached) and records `identity` as having liked.
    pub fn record_like(&mut self, identity: Identity) -> i64 {
        let next = self.count.unwrap_or(DEFAULT_COUNT) + 1;
        self.count = Some(next);
        self.liked.insert(identity);
        next
    }

    /// The cached view for `identity`, or `None` if no value was ever cached.
    pub fn snapshot(&self, identity: &Identity) -> Option<CounterSnapshot> {
        self.count
            .map(|count| CounterSnapshot::new(count, self.has_liked(identity)))
    }
}
