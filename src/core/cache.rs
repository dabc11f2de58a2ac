// ─── TTL Cache ───
// Single-slot cache shared by the metadata and stats endpoints.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::time::Instant;

struct Slot<T> {
    value: Arc<T>,
    stored_at: Instant,
}

/// Holds the last stored value with its timestamp.
///
/// The value is swapped as a whole `Arc`, so readers see either the old or
/// the new value. Refreshes go through a single guard: concurrent misses
/// wait for the running refresh instead of starting their own.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Option<Slot<T>>>,
    refresh: Mutex<()>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// The cached value if it is younger than the TTL.
    pub async fn fresh(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|s| s.stored_at.elapsed() < self.ttl)
            .map(|s| Arc::clone(&s.value))
    }

    /// The cached value regardless of its age.
    pub async fn last_known(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().await;
        slot.as_ref().map(|s| Arc::clone(&s.value))
    }

    /// Replace the cached value and reset its age.
    pub async fn store(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        *self.slot.write().await = Some(Slot {
            value: Arc::clone(&value),
            stored_at: Instant::now(),
        });
        value
    }

    /// Take the refresh guard. Callers re-check [`fresh`](Self::fresh)
    /// after acquiring it, since another refresh may have just finished.
    pub async fn refresh_guard(&self) -> MutexGuard<'_, ()> {
        self.refresh.lock().await
    }

    /// Return the fresh value, or run `refresh` and store its output.
    /// A failed refresh leaves the slot untouched.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.fresh().await {
            return Ok(value);
        }

        let _guard = self.refresh_guard().await;
        if let Some(value) = self.fresh().await {
            return Ok(value);
        }

        let value = refresh().await?;
        Ok(self.store(value).await)
    }
}
