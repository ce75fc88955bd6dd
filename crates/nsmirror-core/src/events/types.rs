//! Watch event types.

use serde::{Deserialize, Serialize};

use crate::secret::Secret;

/// Operation type of a watch event.
///
/// The wire strings are the upper-case forms delivered by the subscription
/// mechanism. Anything else decodes to [`WatchOp::Unrecognized`] so that
/// dispatch on operation type stays a closed, exhaustiveness-checked match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WatchOp {
    /// Secret appeared in the watched namespace.
    Added,
    /// Secret was modified.
    Modified,
    /// Secret was removed.
    Deleted,
    /// Operation type not understood by this engine.
    #[serde(other)]
    Unrecognized,
}

impl WatchOp {
    /// Returns the wire representation of the operation type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchOp::Added => "ADDED",
            WatchOp::Modified => "MODIFIED",
            WatchOp::Deleted => "DELETED",
            WatchOp::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl std::fmt::Display for WatchOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A change notification for one secret.
///
/// The snapshot is the secret as last seen by the event source; for deletes
/// it is the state before removal. The feed is not guaranteed free of
/// duplicates or gaps across reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// What happened.
    pub op: WatchOp,
    /// Snapshot of the affected secret.
    pub secret: Secret,
}

impl WatchEvent {
    /// Creates a new watch event.
    pub fn new(op: WatchOp, secret: Secret) -> Self {
        Self { op, secret }
    }

    /// Creates an "added" event.
    pub fn added(secret: Secret) -> Self {
        Self::new(WatchOp::Added, secret)
    }

    /// Creates a "modified" event.
    pub fn modified(secret: Secret) -> Self {
        Self::new(WatchOp::Modified, secret)
    }

    /// Creates a "deleted" event.
    pub fn deleted(secret: Secret) -> Self {
        Self::new(WatchOp::Deleted, secret)
    }

    /// Returns the namespace of the affected secret.
    pub fn namespace(&self) -> &str {
        self.secret.namespace()
    }
}
