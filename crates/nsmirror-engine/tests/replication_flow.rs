//! End-to-end reconciliation scenarios against the in-memory backend.

use std::sync::Arc;

use async_trait::async_trait;
use nsmirror_core::events::WatchEvent;
use nsmirror_core::{ADDITIONAL_SECRETS_KEY, Secret, TARGET_NAMESPACE_KEY};
use nsmirror_db_memory::MemoryStore;
use nsmirror_engine::{EngineError, Reconciler, SyncAction};
use nsmirror_storage::{SecretStore, StoreError};

fn engine(store: &MemoryStore) -> Reconciler {
    Reconciler::new(Arc::new(store.clone()), "src")
}

fn routed(name: &str) -> Secret {
    Secret::new("src", name).with_annotation(TARGET_NAMESPACE_KEY, "dst")
}

fn routed_with(name: &str, additional: &str) -> Secret {
    routed(name).with_annotation(ADDITIONAL_SECRETS_KEY, additional)
}

#[tokio::test]
async fn create_then_replace_converges() {
    let store = MemoryStore::new();
    let reconciler = engine(&store);

    // First Added creates.
    let outcomes = reconciler
        .handle(&WatchEvent::added(routed("cfg").with_data("token", "v1")))
        .await
        .unwrap();
    assert_eq!(outcomes[0].action, SyncAction::Created);

    // Second Modified replaces, not creates.
    let outcomes = reconciler
        .handle(&WatchEvent::modified(routed("cfg").with_data("token", "v2")))
        .await
        .unwrap();
    assert_eq!(outcomes[0].action, SyncAction::Replaced);

    let replica = store.get("dst", "cfg").await.unwrap().unwrap();
    assert_eq!(replica.data.get("token"), Some(&"v2".to_string()));
    assert_eq!(replica.source_marker(), Some("src"));
}

#[tokio::test]
async fn upsert_is_idempotent() {
    let store = MemoryStore::new();
    let reconciler = engine(&store);
    let event = WatchEvent::added(routed("cfg").with_data("token", "v1"));

    reconciler.handle(&event).await.unwrap();
    let first = store.get("dst", "cfg").await.unwrap().unwrap();

    reconciler.handle(&event).await.unwrap();
    let second = store.get("dst", "cfg").await.unwrap().unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn foreign_occupant_rejected_with_zero_writes() {
    let store = MemoryStore::new();
    let third_party = Secret::new("dst", "cfg").with_data("theirs", "untouched");
    store.create("dst", &third_party).await.unwrap();

    let err = engine(&store)
        .handle(&WatchEvent::added(routed("cfg")))
        .await
        .unwrap_err();

    assert!(err.is_not_overridable());
    assert_eq!(store.get("dst", "cfg").await.unwrap().unwrap(), third_party);
}

#[tokio::test]
async fn fan_out_acts_on_group_in_order() {
    let store = MemoryStore::new();
    store.create("src", &Secret::new("src", "b")).await.unwrap();
    store.create("src", &Secret::new("src", "c")).await.unwrap();

    let outcomes = engine(&store)
        .handle(&WatchEvent::added(routed_with("a", "b, c")))
        .await
        .unwrap();

    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    for name in ["a", "b", "c"] {
        let replica = store.get("dst", name).await.unwrap().unwrap();
        assert_eq!(replica.source_marker(), Some("src"));
    }
}

#[tokio::test]
async fn missing_dependency_aborts_before_any_write() {
    let store = MemoryStore::new();
    store.create("src", &Secret::new("src", "b")).await.unwrap();
    // "c" does not exist in src.

    let err = engine(&store)
        .handle(&WatchEvent::added(routed_with("a", "b, c")))
        .await
        .unwrap_err();

    assert!(err.is_missing_dependency());
    assert!(store.get("dst", "a").await.unwrap().is_none());
    assert!(store.get("dst", "b").await.unwrap().is_none());
}

#[tokio::test]
async fn group_guard_failure_means_no_member_is_written() {
    let store = MemoryStore::new();
    store.create("src", &Secret::new("src", "b")).await.unwrap();
    // The slot for "b" in dst is foreign-owned.
    store.create("dst", &Secret::new("dst", "b")).await.unwrap();

    let err = engine(&store)
        .handle(&WatchEvent::added(routed_with("a", "b")))
        .await
        .unwrap_err();

    assert!(err.is_not_overridable());
    // Neither the head nor the tail was written.
    assert!(store.get("dst", "a").await.unwrap().is_none());
    let occupant = store.get("dst", "b").await.unwrap().unwrap();
    assert_eq!(occupant.source_marker(), None);
}

#[tokio::test]
async fn delete_fans_out_and_tolerates_absent_source_members() {
    let store = MemoryStore::new();
    let reconciler = engine(&store);

    // Replicate a group of three, then drop "c" from the source.
    store.create("src", &Secret::new("src", "b")).await.unwrap();
    store.create("src", &Secret::new("src", "c")).await.unwrap();
    reconciler
        .handle(&WatchEvent::added(routed_with("a", "b, c")))
        .await
        .unwrap();
    store.delete("src", "c").await.unwrap();

    let outcomes = reconciler
        .handle(&WatchEvent::deleted(routed_with("a", "b, c")))
        .await
        .unwrap();

    // "c" was gone on the source side; its target-side delete still ran.
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.action == SyncAction::Deleted));
    for name in ["a", "b", "c"] {
        assert!(store.get("dst", name).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn delete_of_never_replicated_group_is_a_noop() {
    let store = MemoryStore::new();

    let outcomes = engine(&store)
        .handle(&WatchEvent::deleted(routed_with("a", "b")))
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.action == SyncAction::SkippedAbsent));
}

#[tokio::test]
async fn replicas_do_not_leak_into_other_target_slots() {
    let store = MemoryStore::new();
    engine(&store)
        .handle(&WatchEvent::added(routed("cfg")))
        .await
        .unwrap();

    // Only the replica exists: the triggering secret arrived via the event
    // snapshot and was never written to this store.
    assert_eq!(store.len(), 1);
    assert!(store.get("dst", "cfg").await.unwrap().is_some());
}

// ============================================================================
// Fail-fast apply policy
// ============================================================================

/// Store substitute whose writes fail for one poisoned secret name.
struct FailingWrites {
    inner: MemoryStore,
    poisoned: &'static str,
}

#[async_trait]
impl SecretStore for FailingWrites {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError> {
        self.inner.get(namespace, name).await
    }

    async fn create(&self, namespace: &str, secret: &Secret) -> Result<(), StoreError> {
        if secret.name() == self.poisoned {
            return Err(StoreError::connection_error("injected write failure"));
        }
        self.inner.create(namespace, secret).await
    }

    async fn replace(
        &self,
        namespace: &str,
        name: &str,
        secret: &Secret,
    ) -> Result<(), StoreError> {
        if name == self.poisoned {
            return Err(StoreError::connection_error("injected write failure"));
        }
        self.inner.replace(namespace, name, secret).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        if name == self.poisoned {
            return Err(StoreError::connection_error("injected write failure"));
        }
        self.inner.delete(namespace, name).await
    }

    fn backend_name(&self) -> &'static str {
        "failing-writes"
    }
}

#[tokio::test]
async fn upsert_fails_fast_on_store_error() {
    let inner = MemoryStore::new();
    inner.create("src", &Secret::new("src", "b")).await.unwrap();
    inner.create("src", &Secret::new("src", "c")).await.unwrap();

    let store = FailingWrites {
        inner: inner.clone(),
        poisoned: "b",
    };
    let reconciler = Reconciler::new(Arc::new(store), "src");

    let err = reconciler
        .handle(&WatchEvent::added(routed_with("a", "b, c")))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Store(_)));
    // Members before the failure were written; members after were not.
    assert!(inner.get("dst", "a").await.unwrap().is_some());
    assert!(inner.get("dst", "b").await.unwrap().is_none());
    assert!(inner.get("dst", "c").await.unwrap().is_none());
}
