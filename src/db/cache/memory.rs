use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Entry count that triggers the first sweep of expired entries
const MIN_SWEEP_AT: usize = 64;

struct Entry {
    value: String,
    expires_at: Instant,
}

struct Inner {
    entries: HashMap<String, Entry>,
    /// Writes sweep expired entries once the map reaches this size
    sweep_at: usize,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            sweep_at: MIN_SWEEP_AT,
        }
    }
}

impl Inner {
    /// Drops expired entries and moves the next sweep to twice the live size,
    /// so sweeping stays amortised O(1) per write.
    fn sweep(&mut self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.sweep_at = (self.entries.len() * 2).max(MIN_SWEEP_AT);

        tracing::debug!(
            dropped = before - self.entries.len(),
            live = self.entries.len(),
            "Swept expired cache entries"
        );
    }
}

/// In-process key/value store with per-entry expiry.
///
/// Used when no Redis URL is configured. Reads skip expired entries; writes
/// periodically sweep them out, so keys that are never read again are still freed.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        {
            let inner = self.inner.read().await;
            match inner.entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut inner = self.inner.write().await;
        if inner
            .entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            inner.entries.remove(key);
        }
        None
    }

    pub async fn set_ex(&self, key: String, value: String, ttl: u64) {
        let now = Instant::now();
        let expires_at = now + Duration::from_secs(ttl);

        let mut inner = self.inner.write().await;
        if inner.entries.len() >= inner.sweep_at {
            inner.sweep(now);
        }
        inner.entries.insert(key, Entry { value, expires_at });
    }

    pub async fn del(&self, key: &str) {
        self.inner.write().await.entries.remove(key);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}
