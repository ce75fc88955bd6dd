//! Store traits for the secret store abstraction layer.

use async_trait::async_trait;
use nsmirror_core::Secret;

use crate::error::StoreError;

/// The store contract every backend must implement.
///
/// Operations address a single secret by `(namespace, name)`. Implementations
/// must be thread-safe (`Send + Sync`). There is no multi-key transaction
/// primitive; callers that need cross-slot consistency have to approximate it
/// themselves.
///
/// # Example
///
/// ```ignore
/// use nsmirror_storage::{SecretStore, StoreError};
/// use nsmirror_core::Secret;
///
/// async fn fetch(store: &dyn SecretStore, ns: &str, name: &str) -> Result<Secret, StoreError> {
///     store
///         .get(ns, name)
///         .await?
///         .ok_or_else(|| StoreError::not_found(ns, name))
/// }
/// ```
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Reads a secret by namespace and name.
    ///
    /// Returns `None` if the secret does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing
    /// secrets.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError>;

    /// Creates a new secret in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if a secret with the same name
    /// exists in the namespace.
    async fn create(&self, namespace: &str, secret: &Secret) -> Result<(), StoreError>;

    /// Replaces an existing secret in full. Last writer wins; there is no
    /// merge.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the secret does not exist.
    async fn replace(&self, namespace: &str, name: &str, secret: &Secret)
    -> Result<(), StoreError>;

    /// Deletes a secret by namespace and name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the secret does not exist.
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError>;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
