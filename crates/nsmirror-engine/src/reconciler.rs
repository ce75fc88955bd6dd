//! The reconciliation engine.

use nsmirror_core::events::{WatchEvent, WatchOp};
use nsmirror_core::{ReplicationIntent, Secret};
use nsmirror_storage::DynSecretStore;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::error::EngineError;
use crate::group::resolve_group;
use crate::guard::assert_overridable;

/// What happened to one group member at the target namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Replica created.
    Created,
    /// Existing replica replaced in full.
    Replaced,
    /// Replica deleted.
    Deleted,
    /// Delete of a replica that was not there; a no-op.
    SkippedAbsent,
}

impl SyncAction {
    /// Returns the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Created => "created",
            SyncAction::Replaced => "replaced",
            SyncAction::Deleted => "deleted",
            SyncAction::SkippedAbsent => "skipped_absent",
        }
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostics record for one group member of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Name of the secret acted on.
    pub name: String,
    /// Namespace the event originated from.
    pub source_namespace: String,
    /// Namespace the action targeted.
    pub target_namespace: String,
    /// What was done.
    pub action: SyncAction,
}

/// The reconciliation engine.
///
/// Holds the store as an explicit dependency so it can be exercised with a
/// substitute backend. Processes one event per call, with no state retained
/// across events beyond what the store itself holds.
pub struct Reconciler {
    store: DynSecretStore,
    source_namespace: String,
}

impl Reconciler {
    /// Creates an engine replicating out of `source_namespace`.
    pub fn new(store: DynSecretStore, source_namespace: impl Into<String>) -> Self {
        Self {
            store,
            source_namespace: source_namespace.into(),
        }
    }

    /// The namespace this engine replicates out of.
    pub fn source_namespace(&self) -> &str {
        &self.source_namespace
    }

    /// Processes one watch event to completion.
    ///
    /// Returns one outcome per group member acted on; an empty vec when the
    /// secret carries no replication intent. All errors are scoped to this
    /// event and reported with full context before being returned.
    ///
    /// # Errors
    ///
    /// See [`EngineError`]; no writes were attempted for guard and group
    /// failures, and writes stop at the first store error otherwise.
    pub async fn handle(&self, event: &WatchEvent) -> Result<Vec<SyncOutcome>, EngineError> {
        let Some(intent) = ReplicationIntent::from_secret(&event.secret) else {
            debug!(
                secret_name = %event.secret.name(),
                source_namespace = %self.source_namespace,
                "No target namespace detected, ignoring event"
            );
            return Ok(Vec::new());
        };

        let result = self.apply(event, &intent).await;
        if let Err(ref err) = result {
            error!(
                secret_name = %event.secret.name(),
                source_namespace = %self.source_namespace,
                target_namespace = %intent.target_namespace,
                operation = %event.op,
                error = %err,
                "Failed operation"
            );
        }
        result
    }

    async fn apply(
        &self,
        event: &WatchEvent,
        intent: &ReplicationIntent,
    ) -> Result<Vec<SyncOutcome>, EngineError> {
        let target = intent.target_namespace.as_str();
        let group = resolve_group(
            self.store.as_ref(),
            &self.source_namespace,
            &event.secret,
            intent,
            event.op,
        )
        .await?;

        // Guard every member before the first write. Not a transaction, but
        // it keeps a mid-group abort from leaving half the group written.
        for member in &group {
            assert_overridable(
                self.store.as_ref(),
                &self.source_namespace,
                member.name(),
                target,
            )
            .await?;
        }

        // A store failure aborts the remaining members of this event
        // (fail-fast policy).
        let mut outcomes = Vec::with_capacity(group.len());
        match event.op {
            WatchOp::Added | WatchOp::Modified => {
                for member in group {
                    outcomes.push(self.copy_secret(member, target).await?);
                }
            }
            WatchOp::Deleted => {
                for member in group {
                    outcomes.push(self.delete_secret(member.name(), target).await?);
                }
            }
            WatchOp::Unrecognized => {
                return Err(EngineError::unrecognized_operation(event.op.as_str()));
            }
        }

        Ok(outcomes)
    }

    /// Upserts one member at the target namespace: replace when the slot is
    /// occupied, create when it is empty. The replica's metadata is
    /// rewritten before the write.
    async fn copy_secret(
        &self,
        member: Secret,
        target_namespace: &str,
    ) -> Result<SyncOutcome, EngineError> {
        let name = member.name().to_string();
        let replica = member.into_replica(&self.source_namespace, target_namespace);

        let action = if self.store.get(target_namespace, &name).await?.is_some() {
            self.store.replace(target_namespace, &name, &replica).await?;
            SyncAction::Replaced
        } else {
            self.store.create(target_namespace, &replica).await?;
            SyncAction::Created
        };

        info!(
            secret_name = %name,
            source_namespace = %self.source_namespace,
            target_namespace = %target_namespace,
            action = %action,
            "Replicated secret"
        );

        Ok(SyncOutcome {
            name,
            source_namespace: self.source_namespace.clone(),
            target_namespace: target_namespace.to_string(),
            action,
        })
    }

    /// Deletes one member at the target namespace. Absence is a no-op, not
    /// an error.
    async fn delete_secret(
        &self,
        name: &str,
        target_namespace: &str,
    ) -> Result<SyncOutcome, EngineError> {
        let action = if self.store.get(target_namespace, name).await?.is_some() {
            self.store.delete(target_namespace, name).await?;
            info!(
                secret_name = %name,
                source_namespace = %self.source_namespace,
                target_namespace = %target_namespace,
                "Deleted secret"
            );
            SyncAction::Deleted
        } else {
            info!(
                secret_name = %name,
                source_namespace = %self.source_namespace,
                target_namespace = %target_namespace,
                "No secret found that can be deleted"
            );
            SyncAction::SkippedAbsent
        };

        Ok(SyncOutcome {
            name: name.to_string(),
            source_namespace: self.source_namespace.clone(),
            target_namespace: target_namespace.to_string(),
            action,
        })
    }

    /// Consumes the watch feed until it closes.
    ///
    /// Events from other namespaces are ignored. Event-level failures are
    /// reported and the loop continues; a lagged receiver logs the gap and
    /// continues (the event source contract already allows gaps). When the
    /// channel closes the loop returns normally; restarting the
    /// subscription is the caller's responsibility.
    pub async fn run(&self, mut receiver: broadcast::Receiver<WatchEvent>) {
        info!(
            source_namespace = %self.source_namespace,
            backend = %self.store.backend_name(),
            "Watching for secret changes"
        );

        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if event.namespace() != self.source_namespace {
                        continue;
                    }
                    debug!(
                        secret_name = %event.secret.name(),
                        operation = %event.op,
                        "Detected secret change"
                    );
                    // Failures were already reported with full context.
                    let _ = self.handle(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Watch receiver lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Watch channel closed, stopping engine");
                    return;
                }
            }
        }
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("source_namespace", &self.source_namespace)
            .field("backend", &self.store.backend_name())
            .finish()
    }
}
