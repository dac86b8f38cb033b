use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

type SharedFetch<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

/// A value along with the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Creates an entry stamped with the current instant.
    pub fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Whether the entry is younger than `ttl`.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

struct Inner<V, E> {
    entries: HashMap<String, CacheEntry<V>>,
    in_flight: HashMap<String, SharedFetch<V, E>>,
}

/// One namespace of cached values with a single time-to-live, plus the set of fetches currently
/// in flight for it.
///
/// Concurrent callers asking for the same key through [`TtlCache::get_or_fetch`] share a single
/// fetch. Entries are never evicted: an expired entry is only replaced when its key is fetched
/// again, so memory grows with the number of distinct keys seen by the process. That is fine for
/// low-cardinality traffic; a deployment serving many distinct users needs a bounded cache.
///
/// Clones share the same underlying storage.
pub struct TtlCache<V, E> {
    ttl: Duration,
    inner: Arc<Mutex<Inner<V, E>>>,
}

impl<V, E> Clone for TtlCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            ttl: self.ttl,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> fmt::Debug for TtlCache<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner.lock().unwrap();

        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entries", &inner.entries.len())
            .field("in_flight", &inner.in_flight.len())
            .finish()
    }
}

impl<V, E> TtlCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            })),
        }
    }

    /// Gets the value for `key` if it exists and has not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let inner = self.inner.lock().unwrap();

        inner.entries
            .get(key)
            .filter(|entry| entry.is_valid(self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Gets the raw entry for `key`, expired or not.
    pub fn entry(&self, key: &str) -> Option<CacheEntry<V>> {
        self.inner.lock().unwrap().entries.get(key).cloned()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: V) {
        self.inner.lock().unwrap().entries.insert(key.to_string(), CacheEntry::new(value));
    }

    /// Number of stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a fetch for `key` is currently in flight.
    pub fn is_fetching(&self, key: &str) -> bool {
        self.inner.lock().unwrap().in_flight.contains_key(key)
    }

    /// Returns the cached value for `key` when it is still valid. Otherwise joins the fetch
    /// already in flight for `key`, or starts `producer` and registers it as in flight.
    ///
    /// When the fetch completes its in-flight marker is removed. Successful results are stored;
    /// errors are handed to every waiter and not stored.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let fetch = {
            let mut inner = self.inner.lock().unwrap();

            if let Some(entry) = inner.entries.get(key) {
                if entry.is_valid(self.ttl) {
                    return Ok(entry.value.clone());
                }
            }

            if let Some(pending) = inner.in_flight.get(key) {
                log::debug!("Joining in-flight fetch for {key}");
                pending.clone()
            } else {
                let fetch = self.start_fetch(key.to_string(), producer());

                inner.in_flight.insert(key.to_string(), fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    fn start_fetch<Fut>(
        &self,
        key: String,
        future: Fut,
    ) -> SharedFetch<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);

        async move {
            let result = future.await;
            let mut inner = inner.lock().unwrap();

            inner.in_flight.remove(&key);

            if let Ok(value) = &result {
                inner.entries.insert(key, CacheEntry::new(value.clone()));
            }

            result
        }
            .boxed()
            .shared()
    }
}
