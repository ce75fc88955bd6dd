//! The ownership guard.
//!
//! Decides whether the engine may write a given target slot. The check and
//! the subsequent write are separate store calls; another actor can mutate
//! the slot in between. The store offers no compare-and-swap, so this race
//! is accepted and the marker convention is the only protection.

use nsmirror_storage::SecretStore;
use tracing::debug;

use crate::error::EngineError;

/// Asserts that the slot `(target_namespace, name)` may be overwritten by a
/// replica sourced from `source_namespace`.
///
/// Permitted when the slot is empty, or when its occupant carries an
/// ownership marker equal to `source_namespace`. An occupant with a missing
/// or differing marker is foreign-owned or unmanaged and must not be
/// touched.
///
/// # Errors
///
/// Returns `EngineError::NotOverridable` on a guard rejection, or a store
/// error if the read fails.
pub async fn assert_overridable(
    store: &dyn SecretStore,
    source_namespace: &str,
    name: &str,
    target_namespace: &str,
) -> Result<(), EngineError> {
    let Some(occupant) = store.get(target_namespace, name).await? else {
        return Ok(());
    };

    match occupant.source_marker() {
        Some(marker) if marker == source_namespace => Ok(()),
        _ => {
            debug!(
                secret_name = %name,
                source_namespace = %source_namespace,
                target_namespace = %target_namespace,
                occupant_marker = ?occupant.source_marker(),
                "Target slot occupied by a secret this engine does not own"
            );
            Err(EngineError::not_overridable(name, target_namespace))
        }
    }
}
