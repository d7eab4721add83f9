use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

struct Entry<T> {
    value: Arc<T>,
    stored_at: Instant,
}

/// Process-wide, keyed cache whose entries expire after a caller-supplied TTL.
///
/// Fetch-and-store runs under one async lock, so concurrent callers for a
/// stale key trigger a single fetch and the last completed write wins.
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> TtlCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if it is younger than `ttl`,
    /// otherwise run `fetch` and store its result. Failures are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, fetch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(key) {
            if entry.stored_at.elapsed() < ttl {
                debug!(key, "cache hit");
                return Ok(Arc::clone(&entry.value));
            }
            debug!(key, "cache entry expired");
            entries.remove(key);
        } else {
            debug!(key, "cache miss");
        }

        let value = Arc::new(fetch().await?);
        entries.insert(
            key.to_string(),
            Entry {
                value: Arc::clone(&value),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// Drop every entry so the next `get_or_fetch` re-fetches.
    pub async fn invalidate(&self) {
        let mut entries = self.entries.lock().await;
        debug!(dropped = entries.len(), "cache invalidated");
        entries.clear();
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
