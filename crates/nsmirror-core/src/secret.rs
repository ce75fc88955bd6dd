//! The secret data model and the metadata-key wire contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotation that routes a secret to a target namespace.
///
/// Its presence (with a non-empty value) is what opts a secret into
/// replication.
pub const TARGET_NAMESPACE_KEY: &str = "k8s-copy-secret/target-namespace";

/// Annotation listing additional secret names to replicate together with the
/// annotated secret, comma-separated.
pub const ADDITIONAL_SECRETS_KEY: &str = "k8s-copy-secret/additional-secrets";

/// Annotation written onto every replica, recording the namespace it was
/// copied from. This is the ownership marker: a target slot may only be
/// overwritten when it is empty or carries this marker with the current
/// source namespace.
pub const SOURCE_NAMESPACE_KEY: &str = "k8s-copy-secret/source-namespace";

/// Identifying metadata of a [`Secret`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecretMeta {
    /// Name, unique within a namespace.
    pub name: String,
    /// Namespace the secret lives in.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Free-form labels. Not consulted by the engine.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations. Carry the replication routing keys and the ownership
    /// marker.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A named, versionless key/value document.
///
/// The payload in `data` is opaque to the engine and copied verbatim.
/// Identity is `(namespace, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Secret {
    /// Identifying metadata.
    pub metadata: SecretMeta,
    /// Opaque payload, never inspected.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl Secret {
    /// Creates an empty secret at `(namespace, name)`.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: SecretMeta {
                name: name.into(),
                namespace: namespace.into(),
                labels: BTreeMap::new(),
                annotations: BTreeMap::new(),
            },
            data: BTreeMap::new(),
        }
    }

    /// Creates the minimal stub used when a delete group references a secret
    /// that no longer exists on the source side. Only the name is known.
    #[must_use]
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            metadata: SecretMeta {
                name: name.into(),
                ..SecretMeta::default()
            },
            data: BTreeMap::new(),
        }
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    /// Adds a payload entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Returns the secret's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the secret's namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    /// Returns the ownership marker, if this secret carries one.
    #[must_use]
    pub fn source_marker(&self) -> Option<&str> {
        self.metadata
            .annotations
            .get(SOURCE_NAMESPACE_KEY)
            .map(String::as_str)
    }

    /// Rewrites this secret into the replica written at the target namespace.
    ///
    /// Name, labels, and payload are preserved; the namespace is set to the
    /// target; the ownership marker is inserted into the annotations,
    /// replacing any pre-existing marker value.
    #[must_use]
    pub fn into_replica(mut self, source_namespace: &str, target_namespace: &str) -> Self {
        self.metadata.namespace = target_namespace.to_string();
        self.metadata
            .annotations
            .insert(SOURCE_NAMESPACE_KEY.to_string(), source_namespace.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let secret = Secret::new("src", "cfg")
            .with_label("app", "demo")
            .with_annotation(TARGET_NAMESPACE_KEY, "dst")
            .with_data("token", "aGVsbG8=");

        assert_eq!(secret.name(), "cfg");
        assert_eq!(secret.namespace(), "src");
        assert_eq!(secret.metadata.labels.get("app"), Some(&"demo".to_string()));
        assert_eq!(secret.data.get("token"), Some(&"aGVsbG8=".to_string()));
    }

    #[test]
    fn test_placeholder_carries_only_name() {
        let stub = Secret::placeholder("gone");
        assert_eq!(stub.name(), "gone");
        assert!(stub.namespace().is_empty());
        assert!(stub.metadata.annotations.is_empty());
        assert!(stub.data.is_empty());
    }

    #[test]
    fn test_source_marker() {
        let unmarked = Secret::new("src", "cfg");
        assert_eq!(unmarked.source_marker(), None);

        let marked = Secret::new("dst", "cfg").with_annotation(SOURCE_NAMESPACE_KEY, "src");
        assert_eq!(marked.source_marker(), Some("src"));
    }

    #[test]
    fn test_into_replica_rewrites_namespace_and_marker() {
        let replica = Secret::new("src", "cfg")
            .with_label("app", "demo")
            .with_annotation(TARGET_NAMESPACE_KEY, "dst")
            .with_data("token", "aGVsbG8=")
            .into_replica("src", "dst");

        assert_eq!(replica.name(), "cfg");
        assert_eq!(replica.namespace(), "dst");
        assert_eq!(replica.source_marker(), Some("src"));
        // Original labels, annotations, and payload survive.
        assert_eq!(replica.metadata.labels.get("app"), Some(&"demo".to_string()));
        assert_eq!(
            replica.metadata.annotations.get(TARGET_NAMESPACE_KEY),
            Some(&"dst".to_string())
        );
        assert_eq!(replica.data.get("token"), Some(&"aGVsbG8=".to_string()));
    }

    #[test]
    fn test_into_replica_replaces_stale_marker() {
        let replica = Secret::new("src", "cfg")
            .with_annotation(SOURCE_NAMESPACE_KEY, "other")
            .into_replica("src", "dst");

        assert_eq!(replica.source_marker(), Some("src"));
    }

    #[test]
    fn test_serialization_shape() {
        let secret = Secret::new("src", "cfg").with_data("k", "v");
        let json = serde_json::to_value(&secret).unwrap();

        assert_eq!(json["metadata"]["name"], "cfg");
        assert_eq!(json["metadata"]["namespace"], "src");
        assert_eq!(json["data"]["k"], "v");
        // Empty maps are omitted on the wire.
        assert!(json["metadata"].get("labels").is_none());
        assert!(json["metadata"].get("annotations").is_none());
    }

    #[test]
    fn test_deserialization_without_optional_maps() {
        let secret: Secret = serde_json::from_value(json!({
            "metadata": {"name": "cfg", "namespace": "src"}
        }))
        .unwrap();

        assert_eq!(secret.name(), "cfg");
        assert!(secret.metadata.labels.is_empty());
        assert!(secret.data.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let original = Secret::new("src", "cfg")
            .with_annotation(TARGET_NAMESPACE_KEY, "dst")
            .with_data("token", "aGVsbG8=");

        let json = serde_json::to_value(&original).unwrap();
        let parsed: Secret = serde_json::from_value(json).unwrap();
        assert_eq!(original, parsed);
    }
}
