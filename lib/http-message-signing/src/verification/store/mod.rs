use super::Client;
use crate::{Error, KeyId, Result, SignatureVerificationError};
use dashmap::{mapref::entry::Entry, DashMap};
use std::{future::Future, sync::Arc};

pub use self::caching::{CachingClientStore, ClientCache};

mod caching;

/// Registry of clients whose requests can be verified
pub trait ClientStore: Send + Sync {
    /// Register a new client
    ///
    /// Fails with [`Error::DuplicateClient`] if the key ID is taken
    fn register(&self, client: Client) -> impl Future<Output = Result<()>> + Send;

    /// Look up the client with the key ID
    ///
    /// Fails with [`SignatureVerificationError::UnknownClient`] if no such client exists,
    /// and with [`Error::InvalidArgument`] if the key ID is empty
    fn get(&self, key_id: &KeyId) -> impl Future<Output = Result<Client>> + Send;
}

impl<S> ClientStore for Arc<S>
where
    S: ClientStore,
{
    fn register(&self, client: Client) -> impl Future<Output = Result<()>> + Send {
        (**self).register(client)
    }

    fn get(&self, key_id: &KeyId) -> impl Future<Output = Result<Client>> + Send {
        (**self).get(key_id)
    }
}

/// Client store keeping everything in memory
#[derive(Clone, Debug, Default)]
pub struct InMemoryClientStore {
    clients: Arc<DashMap<KeyId, Client>>,
}

impl InMemoryClientStore {
    /// Construct a new, empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a store holding the clients
    pub fn with_clients<I>(clients: I) -> Result<Self>
    where
        I: IntoIterator<Item = Client>,
    {
        let store = Self::new();
        for client in clients {
            store.insert(client)?;
        }
        Ok(store)
    }

    fn insert(&self, client: Client) -> Result<()> {
        if client.key_id.is_empty() {
            return Err(Error::InvalidArgument("key_id"));
        }

        match self.clients.entry(client.key_id.clone()) {
            Entry::Occupied(..) => Err(Error::DuplicateClient(client.key_id)),
            Entry::Vacant(entry) => {
                entry.insert(client);
                Ok(())
            }
        }
    }

    /// Number of registered clients
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no client is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ClientStore for InMemoryClientStore {
    async fn register(&self, client: Client) -> Result<()> {
        self.insert(client)
    }

    async fn get(&self, key_id: &KeyId) -> Result<Client> {
        if key_id.is_empty() {
            return Err(Error::InvalidArgument("key_id"));
        }

        self.clients
            .get(key_id)
            .map(|client| client.value().clone())
            .ok_or(Error::Verification(SignatureVerificationError::UnknownClient))
    }
}
