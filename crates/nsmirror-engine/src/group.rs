//! Replication group resolution.
//!
//! One triggering event fans out to the triggering secret plus every secret
//! named in its additional-secrets annotation. Members are fetched fresh
//! from the source namespace at event-processing time, not taken from the
//! event payload, so stale snapshots never get replicated.

use nsmirror_core::events::WatchOp;
use nsmirror_core::{ReplicationIntent, Secret};
use nsmirror_storage::SecretStore;
use tracing::debug;

use crate::error::EngineError;

/// Expands a triggering secret into the ordered replication group.
///
/// Head = the triggering secret; tail = each additional name, in
/// declaration order. An additional secret absent from the source namespace
/// is tolerated for `Deleted` events (a minimal placeholder joins the group
/// so the target-side delete is still attempted) and fails the whole
/// resolution otherwise, before any mutation.
///
/// # Errors
///
/// Returns `EngineError::MissingDependency` for an absent member during an
/// upsert, or a store error if a fetch fails.
pub async fn resolve_group(
    store: &dyn SecretStore,
    source_namespace: &str,
    secret: &Secret,
    intent: &ReplicationIntent,
    op: WatchOp,
) -> Result<Vec<Secret>, EngineError> {
    let mut group = Vec::with_capacity(1 + intent.additional_secrets.len());
    group.push(secret.clone());

    for name in &intent.additional_secrets {
        match store.get(source_namespace, name).await? {
            Some(member) => group.push(member),
            // Deleting something that is already gone on the source side is
            // fine; the target-side delete still has to happen.
            None if op == WatchOp::Deleted => {
                debug!(
                    secret_name = %name,
                    source_namespace = %source_namespace,
                    "Additional secret absent on source, queuing placeholder for delete"
                );
                group.push(Secret::placeholder(name));
            }
            None => {
                return Err(EngineError::missing_dependency(name, source_namespace));
            }
        }
    }

    Ok(group)
}
