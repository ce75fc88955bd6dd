//! # nsmirror-engine
//!
//! The reconciliation engine: consumes watch events for a source namespace
//! and replicates opted-in secrets into their declared target namespaces.
//!
//! ## Overview
//!
//! One event is processed at a time, terminal in one pass:
//!
//! 1. Secrets without a replication intent are skipped.
//! 2. The event is expanded into its replication group (the triggering
//!    secret plus any declared additional secrets, fetched fresh from the
//!    source namespace).
//! 3. Every group member passes the ownership guard before any write, so a
//!    foreign-owned target slot aborts the whole event with zero side
//!    effects. This is a best-effort atomicity approximation; the store
//!    offers no transaction primitive.
//! 4. The operation is applied per member in order: upsert for
//!    added/modified, idempotent delete for deleted.
//!
//! Failures are scoped to the event: the [`Reconciler::run`] loop reports
//! them and keeps watching.

mod error;
mod group;
mod guard;
mod reconciler;

pub use error::EngineError;
pub use group::resolve_group;
pub use guard::assert_overridable;
pub use reconciler::{Reconciler, SyncAction, SyncOutcome};

/// Type alias for an engine result.
pub type EngineResult<T> = Result<T, EngineError>;
