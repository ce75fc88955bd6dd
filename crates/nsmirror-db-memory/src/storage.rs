//! In-memory secret store backed by a papaya lock-free map.

use std::sync::Arc;

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;

use nsmirror_core::Secret;
use nsmirror_storage::{SecretStore, StoreError};

type StorageKey = String;

pub(crate) fn make_storage_key(namespace: &str, name: &str) -> StorageKey {
    format!("{namespace}/{name}")
}

/// In-memory secret store.
///
/// Characteristics:
/// - Lock-free concurrent access via papaya::HashMap
/// - No persistence; contents live as long as the process
/// - Clones share the same underlying map
#[derive(Clone)]
pub struct MemoryStore {
    data: Arc<PapayaHashMap<StorageKey, Secret>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
        }
    }

    /// Number of secrets currently held, across all namespaces.
    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    /// Whether the store holds no secrets.
    pub fn is_empty(&self) -> bool {
        self.data.pin().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError> {
        let key = make_storage_key(namespace, name);
        let guard = self.data.pin();
        Ok(guard.get(&key).cloned())
    }

    async fn create(&self, namespace: &str, secret: &Secret) -> Result<(), StoreError> {
        let key = make_storage_key(namespace, secret.name());
        let guard = self.data.pin();

        if guard.get(&key).is_some() {
            return Err(StoreError::already_exists(namespace, secret.name()));
        }
        guard.insert(key, secret.clone());
        Ok(())
    }

    async fn replace(
        &self,
        namespace: &str,
        name: &str,
        secret: &Secret,
    ) -> Result<(), StoreError> {
        let key = make_storage_key(namespace, name);
        let guard = self.data.pin();

        if guard.get(&key).is_none() {
            return Err(StoreError::not_found(namespace, name));
        }
        guard.insert(key, secret.clone());
        Ok(())
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        let key = make_storage_key(namespace, name);
        let guard = self.data.pin();

        if guard.remove(&key).is_none() {
            return Err(StoreError::not_found(namespace, name));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("secrets", &self.len())
            .finish()
    }
}
