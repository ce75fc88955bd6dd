//! # nsmirror-server
//!
//! Process bootstrap for the nsmirror daemon: configuration resolution,
//! tracing setup, and wiring of the store, watch feed, and reconciliation
//! engine.

pub mod config;
pub mod observability;
