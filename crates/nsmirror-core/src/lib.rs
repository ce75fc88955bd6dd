//! # nsmirror-core
//!
//! Core types for the nsmirror namespace replicator.
//!
//! This crate defines the secret data model, the metadata keys that make up
//! the wire contract with the source-of-truth system, the replication intent
//! parser, and the watch event types that drive the reconciliation engine.
//!
//! ## Overview
//!
//! A [`Secret`] is a named, versionless key/value document scoped to a
//! namespace. A secret opts into replication by carrying the
//! [`TARGET_NAMESPACE_KEY`] annotation; [`ReplicationIntent`] is the parsed
//! view of that routing metadata. Change notifications for a namespace's
//! secrets flow as [`events::WatchEvent`]s.

pub mod events;
mod intent;
mod secret;

pub use intent::ReplicationIntent;
pub use secret::{
    ADDITIONAL_SECRETS_KEY, SOURCE_NAMESPACE_KEY, Secret, SecretMeta, TARGET_NAMESPACE_KEY,
};
