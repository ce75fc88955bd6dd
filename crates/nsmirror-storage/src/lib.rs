//! # nsmirror-storage
//!
//! Secret store abstraction layer for nsmirror.
//!
//! This crate defines the trait a resource store collaborator must
//! implement, the storage error taxonomy, and an evented wrapper that feeds
//! the watch channel. It contains no backend; backends live in separate
//! crates.
//!
//! ## Overview
//!
//! The main trait is [`SecretStore`]: point read, create, replace, and
//! delete of a single secret identified by `(namespace, name)`. A read of a
//! missing secret is the non-error absent value `None`; only infrastructure
//! problems surface as errors.
//!
//! ```ignore
//! use nsmirror_storage::{SecretStore, StoreError};
//!
//! async fn exists(store: &dyn SecretStore, ns: &str, name: &str) -> Result<bool, StoreError> {
//!     Ok(store.get(ns, name).await?.is_some())
//! }
//! ```

mod error;
mod evented;
mod traits;

pub use error::{ErrorCategory, StoreError};
pub use evented::EventedStore;
pub use traits::SecretStore;

/// Type alias for a store result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Type alias for a shared store trait object.
pub type DynSecretStore = std::sync::Arc<dyn SecretStore>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ErrorCategory, StoreError};
    pub use crate::evented::EventedStore;
    pub use crate::traits::SecretStore;
    pub use crate::{DynSecretStore, StoreResult};
}
