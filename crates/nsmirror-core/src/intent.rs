//! Replication intent parsing.
//!
//! The intent is a pure view over a secret's annotations; it is never stored
//! separately. Parsing cannot fail: missing or malformed routing metadata
//! degrades to "no intent" or an empty additional list.

use crate::secret::{ADDITIONAL_SECRETS_KEY, Secret, TARGET_NAMESPACE_KEY};

/// Routing metadata extracted from a secret's annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationIntent {
    /// Namespace the secret (and its group) should be replicated into.
    pub target_namespace: String,
    /// Names of additional secrets to replicate together with the annotated
    /// one, in declaration order.
    pub additional_secrets: Vec<String>,
}

impl ReplicationIntent {
    /// Parses the replication intent from a secret's annotations.
    ///
    /// Returns `None` when the target-namespace annotation is absent or
    /// empty, meaning the secret does not participate in replication.
    #[must_use]
    pub fn from_secret(secret: &Secret) -> Option<Self> {
        let target = secret.metadata.annotations.get(TARGET_NAMESPACE_KEY)?;
        if target.is_empty() {
            return None;
        }

        let additional_secrets = secret
            .metadata
            .annotations
            .get(ADDITIONAL_SECRETS_KEY)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            target_namespace: target.clone(),
            additional_secrets,
        })
    }
}
