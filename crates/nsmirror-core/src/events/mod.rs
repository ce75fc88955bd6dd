//! Watch event types and the in-process event bus.
//!
//! Change notifications for a namespace's secrets are delivered as
//! [`WatchEvent`]s. The [`WatchBroadcaster`] is the channel they travel on:
//! a thin wrapper around tokio's broadcast channel so multiple consumers can
//! observe the same feed.

mod broadcaster;
mod types;

pub use broadcaster::WatchBroadcaster;
pub use types::{WatchEvent, WatchOp};
