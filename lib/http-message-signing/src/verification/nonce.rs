use crate::{KeyId, Result};
use moka::{
    future::Cache,
    ops::compute::{CompResult, Op},
};
use std::{
    future::{self, Future},
    time::SystemTime,
};

/// Nonce registered by a client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce {
    /// Client the nonce belongs to
    pub key_id: KeyId,

    /// Nonce value
    pub value: String,

    /// Point in time after which the nonce may be reused
    pub expiration: SystemTime,
}

/// Storage of used nonces
pub trait NonceStore: Send + Sync {
    /// Look up a nonce of a client
    fn get(
        &self,
        key_id: &KeyId,
        value: &str,
    ) -> impl Future<Output = Result<Option<Nonce>>> + Send;

    /// Register the nonce unless a registration that expires after `now` exists
    ///
    /// Check and registration have to be atomic. Returns whether the nonce was registered.
    fn register_if_unused(
        &self,
        nonce: Nonce,
        now: SystemTime,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// In-memory nonce store
///
/// Bounded in size, the least recently used nonces are evicted first
#[derive(Clone)]
pub struct InMemoryNonceStore {
    inner: Cache<(KeyId, String), Nonce>,
}

impl InMemoryNonceStore {
    /// Construct a new store holding up to `size` nonces
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(size).build(),
        }
    }
}

impl Default for InMemoryNonceStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl NonceStore for InMemoryNonceStore {
    async fn get(&self, key_id: &KeyId, value: &str) -> Result<Option<Nonce>> {
        Ok(self.inner.get(&(key_id.clone(), value.to_string())).await)
    }

    async fn register_if_unused(&self, nonce: Nonce, now: SystemTime) -> Result<bool> {
        let key = (nonce.key_id.clone(), nonce.value.clone());
        let result = self
            .inner
            .entry(key)
            .and_compute_with(|previous| {
                let op = match previous {
                    Some(previous) if previous.value().expiration > now => Op::Nop,
                    _ => Op::Put(nonce),
                };
                future::ready(op)
            })
            .await;

        Ok(matches!(
            result,
            CompResult::Inserted(..) | CompResult::ReplacedWith(..)
        ))
    }
}
