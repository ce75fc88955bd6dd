//! `EventedStore` - a store wrapper that emits watch events after writes.
//!
//! The wrapper delegates all operations to an inner store and sends a watch
//! event to a broadcaster after each successful mutation. Events are emitted
//! **after** the operation succeeds, so the watch feed never reports a
//! change that did not reach the store.

use std::sync::Arc;

use async_trait::async_trait;
use nsmirror_core::Secret;
use nsmirror_core::events::WatchBroadcaster;
use tracing::debug;

use crate::error::StoreError;
use crate::traits::SecretStore;

/// A store wrapper that emits watch events after successful mutations.
///
/// Reads pass through silently. For deletes, the secret is snapshotted
/// before removal so the emitted event carries its last known state.
pub struct EventedStore<S: SecretStore> {
    /// The inner store implementation.
    inner: S,
    /// The watch event broadcaster.
    broadcaster: Arc<WatchBroadcaster>,
}

impl<S: SecretStore> EventedStore<S> {
    /// Creates a new evented store wrapper.
    pub fn new(inner: S, broadcaster: Arc<WatchBroadcaster>) -> Self {
        Self { inner, broadcaster }
    }

    /// Returns a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a reference to the broadcaster.
    pub fn broadcaster(&self) -> &Arc<WatchBroadcaster> {
        &self.broadcaster
    }

    fn emit_added(&self, secret: &Secret) {
        if self.broadcaster.subscriber_count() == 0 {
            return;
        }
        let count = self.broadcaster.send_added(secret.clone());
        debug!(
            secret_name = %secret.name(),
            namespace = %secret.namespace(),
            subscribers = count,
            "Emitted ADDED watch event"
        );
    }

    fn emit_modified(&self, secret: &Secret) {
        if self.broadcaster.subscriber_count() == 0 {
            return;
        }
        let count = self.broadcaster.send_modified(secret.clone());
        debug!(
            secret_name = %secret.name(),
            namespace = %secret.namespace(),
            subscribers = count,
            "Emitted MODIFIED watch event"
        );
    }

    fn emit_deleted(&self, secret: &Secret) {
        if self.broadcaster.subscriber_count() == 0 {
            return;
        }
        let count = self.broadcaster.send_deleted(secret.clone());
        debug!(
            secret_name = %secret.name(),
            namespace = %secret.namespace(),
            subscribers = count,
            "Emitted DELETED watch event"
        );
    }
}

#[async_trait]
impl<S: SecretStore> SecretStore for EventedStore<S> {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError> {
        // Reads don't emit events.
        self.inner.get(namespace, name).await
    }

    async fn create(&self, namespace: &str, secret: &Secret) -> Result<(), StoreError> {
        self.inner.create(namespace, secret).await?;
        self.emit_added(secret);
        Ok(())
    }

    async fn replace(
        &self,
        namespace: &str,
        name: &str,
        secret: &Secret,
    ) -> Result<(), StoreError> {
        self.inner.replace(namespace, name, secret).await?;
        self.emit_modified(secret);
        Ok(())
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        // Snapshot first so the event carries the last known state.
        let snapshot = self.inner.get(namespace, name).await?;
        self.inner.delete(namespace, name).await?;

        let secret = snapshot.unwrap_or_else(|| Secret::new(namespace, name));
        self.emit_deleted(&secret);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

impl<S: SecretStore> std::fmt::Debug for EventedStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventedStore")
            .field("backend", &self.inner.backend_name())
            .field("subscriber_count", &self.broadcaster.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    // Behavioral tests for the wrapper live next to the in-memory backend,
    // which provides the inner store they need.

    use nsmirror_core::events::WatchBroadcaster;

    #[test]
    fn test_broadcaster_starts_idle() {
        let broadcaster = WatchBroadcaster::new();
        assert!(!broadcaster.has_subscribers());
    }
}
