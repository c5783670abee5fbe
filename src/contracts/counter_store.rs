use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::contracts::error::UpstreamError;

/// Value shown when the counter record is missing or malformed.
pub const DEFAULT_COUNT: i64 = 104;

/// Current value of the like counter as seen by one caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub count: i64,
    /// Whether the caller has already incremented the counter.
    pub has_liked: bool,
}

impl CounterSnapshot {
    pub fn new(count: i64, has_liked: bool) -> Self {
        Self { count, has_liked }
    }
}

impl Default for CounterSnapshot {
    fn default() -> Self {
        Self::new(DEFAULT_COUNT, false)
    }
}

/// A remote store holding a single like counter.
///
/// `increment` is a plain read-modify-write: two concurrent callers may
/// both read the same value and one increment is lost. Implementations do
/// not deduplicate; callers gate repeated likes themselves.
pub trait CounterStore: Send + Sync {
    /// Reads the current counter value.
    fn fetch_count(&self) -> impl Future<Output = Result<CounterSnapshot, UpstreamError>> + Send;

    /// Increments the counter by one and returns the new value.
    fn increment(&self) -> impl Future<Output = Result<i64, UpstreamError>> + Send;
}
