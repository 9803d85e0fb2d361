use super::ClientStore;
use crate::{verification::Client, Clock, KeyId, Result};
use moka::future::Cache;
use std::time::{Duration, SystemTime};

#[derive(Clone)]
struct CachedClient {
    client: Client,
    expires_at: SystemTime,
}

/// Shared cache of resolved clients
///
/// Cloning the handle shares the underlying cache. Dropping a [`CachingClientStore`]
/// leaves the cache and every other handle to it untouched.
#[derive(Clone)]
pub struct ClientCache {
    inner: Cache<KeyId, CachedClient>,
}

impl ClientCache {
    /// Construct a new cache holding up to `size` clients
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(size).build(),
        }
    }

    /// Drop every cached client
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for ClientCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Client store decorator caching lookups for a fixed time
///
/// Writes always go to the wrapped store. A zero time-to-live disables caching.
pub struct CachingClientStore<S> {
    inner: S,
    cache: ClientCache,
    ttl: Duration,
    clock: Clock,
}

impl<S> CachingClientStore<S>
where
    S: ClientStore,
{
    /// Wrap the store
    #[must_use]
    pub fn new(inner: S, cache: ClientCache, ttl: Duration) -> Self {
        Self {
            inner,
            cache,
            ttl,
            clock: Clock::new(),
        }
    }

    /// Replace the clock the expiration of cache entries is measured with
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the store
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> ClientStore for CachingClientStore<S>
where
    S: ClientStore,
{
    async fn register(&self, client: Client) -> Result<()> {
        self.inner.register(client).await
    }

    async fn get(&self, key_id: &KeyId) -> Result<Client> {
        if self.ttl.is_zero() {
            return self.inner.get(key_id).await;
        }

        let now = self.clock.now();
        if let Some(cached) = self.cache.inner.get(key_id).await {
            if cached.expires_at > now {
                trace!(%key_id, "client cache hit");
                return Ok(cached.client);
            }
        }

        let client = self.inner.get(key_id).await?;
        if let Some(expires_at) = now.checked_add(self.ttl) {
            self.cache
                .inner
                .insert(
                    key_id.clone(),
                    CachedClient {
                        client: client.clone(),
                        expires_at,
                    },
                )
                .await;
        }

        Ok(client)
    }
}
