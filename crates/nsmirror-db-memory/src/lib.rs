//! # nsmirror-db-memory
//!
//! In-memory [`SecretStore`](nsmirror_storage::SecretStore) backend.
//!
//! Backed by a lock-free papaya map keyed by `namespace/name`. Used by the
//! test suites and for local runs where no real cluster store is wired in.

mod storage;

pub use storage::MemoryStore;
