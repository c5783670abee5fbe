use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::contracts::{CacheError, CounterSnapshot, CounterStore, LikeError, DEFAULT_COUNT};
use crate::counter::fallback::{FallbackChain, Source, StepResult};
use crate::counter::local::{Identity, LocalCounterCache};
use crate::guard::InFlightGuard;

/// Counter value as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub count: i64,
    pub has_liked: bool,
    pub source: Source,
}

impl CounterView {
    fn new(snapshot: CounterSnapshot, source: Source) -> Self {
        Self {
            count: snapshot.count,
            has_liked: snapshot.has_liked,
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The counter was incremented by this call.
    Liked(CounterView),
    /// This identity had liked before; nothing was sent.
    AlreadyLiked(CounterView),
}

impl LikeOutcome {
    pub fn view(&self) -> CounterView {
        match self {
            LikeOutcome::Liked(view) | LikeOutcome::AlreadyLiked(view) => *view,
        }
    }
}

/// The like button's side of the counter.
///
/// Reads go remote → local cache → default. Likes go remote → local cache;
/// a like served from the local cache is never reconciled with the remote
/// store. Each identity likes at most once, and only one like may be in
/// flight per client.
pub struct LikeClient<S> {
    store: S,
    identity: Identity,
    cache: Mutex<LocalCounterCache>,
    cache_path: Option<PathBuf>,
    trigger: InFlightGuard,
}

impl<S: CounterStore> LikeClient<S> {
    /// Creates a client with an in-memory cache that is not persisted.
    pub fn new(store: S, identity: Identity) -> Self {
        Self::with_cache(store, identity, LocalCounterCache::new())
    }

    pub fn with_cache(store: S, identity: Identity, cache: LocalCounterCache) -> Self {
        Self {
            store,
            identity,
            cache: Mutex::new(cache),
            cache_path: None,
            trigger: InFlightGuard::new(),
        }
    }

    /// Creates a client whose cache is loaded from and saved to `path`.
    pub fn open(
        store: S,
        identity: Identity,
        path: impl Into<PathBuf>,
    ) -> Result<Self, CacheError> {
        let path = path.into();
        let cache = LocalCounterCache::load(&path)?;
        let mut client = Self::with_cache(store, identity, cache);
        client.cache_path = Some(path);
        Ok(client)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A copy of the current local cache.
    pub async fn cache(&self) -> LocalCounterCache {
        self.cache.lock().await.clone()
    }

    /// Whether a like is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.trigger.is_busy()
    }

    /// Reads the counter. Never fails: falls back to the cached value and
    /// then to the default.
    pub async fn fetch_count(&self) -> CounterView {
        let remote = async {
            match self.store.fetch_count().await {
                Ok(snapshot) => {
                    let mut cache = self.cache.lock().await;
                    cache.remember(snapshot.count);
                    if let Err(e) = self.persist(&cache) {
                        tracing::warn!(error = %e, "Failed to persist counter cache");
                    }
                    let has_liked = snapshot.has_liked || cache.has_liked(&self.identity);
                    StepResult::Success(CounterSnapshot::new(snapshot.count, has_liked))
                }
                Err(e) => StepResult::Failure(e.to_string()),
            }
        };
        let local = async {
            match self.cache.lock().await.snapshot(&self.identity) {
                Some(snapshot) => StepResult::Success(snapshot),
                None => StepResult::Failure("no cached value".into()),
            }
        };
        let default = async { StepResult::Success(CounterSnapshot::default()) };

        match FallbackChain::new()
            .then(Source::Remote, remote)
            .then(Source::LocalCache, local)
            .then(Source::Default, default)
            .run()
            .await
        {
            Ok(resolved) => CounterView::new(resolved.value, resolved.source),
            Err(e) => {
                tracing::error!(error = %e, "Counter read fallback exhausted");
                CounterView::new(CounterSnapshot::default(), Source::Default)
            }
        }
    }

    /// Likes once for this client's identity.
    ///
    /// Returns [`LikeOutcome::AlreadyLiked`] without contacting the store if
    /// the identity liked before. Fails with [`LikeError::InFlight`] while
    /// another like is running, and with [`LikeError::Exhausted`] only when
    /// the remote store failed and the local cache could not be saved.
    pub async fn like(&self) -> Result<LikeOutcome, LikeError> {
        let Some(_permit) = self.trigger.try_acquire() else {
            return Err(LikeError::InFlight);
        };

        {
            let cache = self.cache.lock().await;
            if cache.has_liked(&self.identity) {
                let snapshot = cache
                    .snapshot(&self.identity)
                    .unwrap_or(CounterSnapshot::new(DEFAULT_COUNT, true));
                return Ok(LikeOutcome::AlreadyLiked(CounterView::new(
                    snapshot,
                    Source::LocalCache,
                )));
            }
        }

        let remote = async {
            match self.store.increment().await {
                Ok(count) => {
                    let mut cache = self.cache.lock().await;
                    cache.remember(count);
                    cache.mark_liked(self.identity.clone());
                    if let Err(e) = self.persist(&cache) {
                        tracing::warn!(error = %e, "Failed to persist counter cache");
                    }
                    StepResult::Success(count)
                }
                Err(e) => StepResult::Failure(e.to_string()),
            }
        };
        let local = async {
            let mut cache = self.cache.lock().await;
            let previous = cache.clone();
            let count = cache.record_like(self.identity.clone());
            match self.persist(&cache) {
                Ok(()) => StepResult::Success(count),
                Err(e) => {
                    *cache = previous;
                    StepResult::Failure(e.to_string())
                }
            }
        };

        let resolved = FallbackChain::new()
            .then(Source::Remote, remote)
            .then(Source::LocalCache, local)
            .run()
            .await
            .map_err(|e| LikeError::Exhausted(e.to_string()))?;

        tracing::info!(
            identity = %self.identity,
            count = resolved.value,
            source = %resolved.source,
            "Liked"
        );

        Ok(LikeOutcome::Liked(CounterView {
            count: resolved.value,
            has_liked: true,
            source: resolved.source,
        }))
    }

    fn persist(&self, cache: &LocalCounterCache) -> Result<(), CacheError> {
        match &self.cache_path {
            Some(path) => cache.save(path),
            None => Ok(()),
        }
    }
}
