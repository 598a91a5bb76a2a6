// ── Generic keyed resource cache ──
//
// Async memoization with loading/ready/failed states and push-based
// change notification via `watch` channels. Keys are caller-defined
// strings; the cache knows nothing about resource semantics.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;

/// State of one cached fetch.
///
/// Created in `Loading`, transitions exactly once to `Ready` or `Failed`,
/// and stays there until the entry is explicitly invalidated. Staleness is
/// never time-based.
#[derive(Debug, Clone)]
pub enum CacheEntry<T> {
    Loading,
    Ready(Arc<T>),
    Failed(Arc<CoreError>),
}

impl<T> CacheEntry<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Arc<CoreError>> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Keyed async memoization over `watch` channels.
///
/// For any key, at most one loader is in flight at a time: the first
/// [`get`](Self::get) for a key inserts a `Loading` entry and spawns the
/// loader; concurrent subscribers attach to the same channel and share the
/// outcome. Entries remain until explicitly invalidated -- there is no
/// background expiry and no automatic retry.
pub struct ResourceCache<T> {
    entries: DashMap<String, watch::Sender<CacheEntry<T>>>,
}

impl<T: Send + Sync + 'static> ResourceCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Return the entry channel for `key`, creating it (and invoking the
    /// loader) only if no entry exists.
    ///
    /// The loader runs on a spawned task. If the entry is invalidated
    /// before the loader resolves, the result still lands in the orphaned
    /// channel for subscribers already attached, but a fresh `get` starts
    /// a new fetch -- in-flight work is never hard-cancelled.
    pub fn get<F, Fut>(&self, key: &str, loader: F) -> watch::Receiver<CacheEntry<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(occupied) => occupied.get().subscribe(),
            Entry::Vacant(vacant) => {
                let (tx, rx) = watch::channel(CacheEntry::Loading);
                let publisher = tx.clone();
                vacant.insert(tx);

                let fut = loader();
                let key = key.to_owned();
                tokio::spawn(async move {
                    let entry = match fut.await {
                        Ok(value) => CacheEntry::Ready(Arc::new(value)),
                        Err(e) => {
                            debug!(key, error = %e, "resource fetch failed");
                            CacheEntry::Failed(Arc::new(e))
                        }
                    };
                    // send_replace publishes even with zero receivers, so a
                    // later subscriber to this entry still sees the outcome.
                    publisher.send_replace(entry);
                });

                rx
            }
        }
    }

    /// `get` and await a terminal state.
    pub async fn fetch<F, Fut>(&self, key: &str, loader: F) -> Result<Arc<T>, Arc<CoreError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        resolve(self.get(key, loader)).await
    }

    /// Discard the entry for `key`, forcing the next `get` to re-fetch.
    /// Returns `true` if an entry existed.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(key, "cache entry invalidated");
        }
        removed
    }

    /// Discard every entry, returning the keys that were dropped.
    pub fn invalidate_all(&self) -> Vec<String> {
        let keys = self.keys();
        for key in &keys {
            self.entries.remove(key);
        }
        keys
    }

    /// Invalidate, then `get`.
    pub fn refresh<F, Fut>(&self, key: &str, loader: F) -> watch::Receiver<CacheEntry<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        self.invalidate(key);
        self.get(key, loader)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Send + Sync + 'static> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Await a terminal state on an entry channel.
pub async fn resolve<T>(
    mut rx: watch::Receiver<CacheEntry<T>>,
) -> Result<Arc<T>, Arc<CoreError>> {
    loop {
        {
            let entry = rx.borrow_and_update();
            match &*entry {
                CacheEntry::Ready(v) => return Ok(Arc::clone(v)),
                CacheEntry::Failed(e) => return Err(Arc::clone(e)),
                CacheEntry::Loading => {}
            }
        }
        if rx.changed().await.is_err() {
            // Sender gone without a terminal state; treat as a discarded fetch.
            return Err(Arc::new(CoreError::Internal(
                "cache entry dropped while loading".into(),
            )));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    type BoxedLoad = std::pin::Pin<Box<dyn Future<Output = Result<u32, CoreError>> + Send>>;

    fn counting_loader(calls: &Arc<AtomicUsize>, value: u32) -> impl FnOnce() -> BoxedLoad {
        let calls = Arc::clone(calls);
        move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        }
    }

    #[tokio::test]
    async fn concurrent_gets_invoke_loader_once() {
        let cache: ResourceCache<u32> = ResourceCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let rx1 = cache.get("k", {
            let calls = Arc::clone(&calls);
            let gate = Arc::clone(&gate);
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok(7)
            }
        });

        // Second subscriber while the first fetch is still loading.
        let rx2 = cache.get("k", counting_loader(&calls, 99));
        assert!(rx2.borrow().is_loading());

        gate.notify_one();

        let v1 = resolve(rx1).await.unwrap();
        let v2 = resolve(rx2).await.unwrap();

        assert_eq!(*v1, 7);
        assert_eq!(*v2, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache: ResourceCache<u32> = ResourceCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let v = cache.fetch("k", counting_loader(&calls, 1)).await.unwrap();
        assert_eq!(*v, 1);

        // A repeat get does not re-invoke the loader.
        let v = cache.fetch("k", counting_loader(&calls, 2)).await.unwrap();
        assert_eq!(*v, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(cache.invalidate("k"));
        let v = cache.fetch("k", counting_loader(&calls, 3)).await.unwrap();
        assert_eq!(*v, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_reinvokes_loader_regardless_of_state() {
        let cache: ResourceCache<u32> = ResourceCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch("k", counting_loader(&calls, 1)).await.unwrap();
        let rx = cache.refresh("k", counting_loader(&calls, 2));
        let v = resolve(rx).await.unwrap();

        assert_eq!(*v, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_entry_sticks_until_invalidated() {
        let cache: ResourceCache<u32> = ResourceCache::new();

        let err = cache
            .fetch("k", || async {
                Err(CoreError::Transport {
                    message: "connection refused".into(),
                })
            })
            .await
            .unwrap_err();
        assert!(err.is_retryable());

        // The failure is memoized; no silent retry on the next get.
        let rx = cache.get("k", || async { Ok(42) });
        assert!(resolve(rx).await.is_err());

        // Explicit refresh recovers.
        let rx = cache.refresh("k", || async { Ok(42) });
        assert_eq!(*resolve(rx).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn in_flight_result_discarded_after_invalidate() {
        let cache: Arc<ResourceCache<u32>> = Arc::new(ResourceCache::new());
        let gate = Arc::new(Notify::new());

        let slow_rx = cache.get("k", {
            let gate = Arc::clone(&gate);
            move || async move {
                gate.notified().await;
                Ok(1)
            }
        });

        cache.invalidate("k");
        let fast_rx = cache.get("k", || async { Ok(2) });

        gate.notify_one();

        // The replacement entry resolves from its own loader, the orphaned
        // channel still completes for its original subscriber.
        assert_eq!(*resolve(fast_rx).await.unwrap(), 2);
        assert_eq!(*resolve(slow_rx).await.unwrap(), 1);
        assert_eq!(*cache.fetch("k", || async { Ok(99) }).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn invalidate_all_reports_dropped_keys() {
        let cache: ResourceCache<u32> = ResourceCache::new();
        cache.fetch("a", || async { Ok(1) }).await.unwrap();
        cache.fetch("b", || async { Ok(2) }).await.unwrap();

        let mut dropped = cache.invalidate_all();
        dropped.sort();

        assert_eq!(dropped, vec!["a".to_string(), "b".to_string()]);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn independent_keys_do_not_interfere() {
        let cache: ResourceCache<u32> = ResourceCache::new();

        let a = cache.fetch("a", || async { Ok(1) }).await.unwrap();
        let b = cache.fetch("b", || async { Ok(2) }).await.unwrap();

        assert_eq!(*a, 1);
        assert_eq!(*b, 2);
        assert_eq!(cache.len(), 2);
    }
}
