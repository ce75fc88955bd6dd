//! Broadcast channel for watch events.

use tokio::sync::broadcast;

use super::types::{WatchEvent, WatchOp};
use crate::secret::Secret;

/// Default buffer size for the broadcast channel.
/// Slow receivers beyond this limit see a lag error instead of blocking
/// the producer.
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Multi-producer, multi-consumer bus for [`WatchEvent`]s.
///
/// Cloneable and shareable; every subscriber receives every event sent
/// after it subscribed.
#[derive(Clone)]
pub struct WatchBroadcaster {
    sender: broadcast::Sender<WatchEvent>,
}

impl WatchBroadcaster {
    /// Creates a broadcaster with the default buffer size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// Creates a broadcaster with a custom buffer size.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Sends a watch event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event;
    /// 0 when nobody is listening.
    pub fn send(&self, event: WatchEvent) -> usize {
        self.sender.send(event).unwrap_or_default()
    }

    /// Sends an "added" event for `secret`.
    pub fn send_added(&self, secret: Secret) -> usize {
        self.send(WatchEvent::new(WatchOp::Added, secret))
    }

    /// Sends a "modified" event for `secret`.
    pub fn send_modified(&self, secret: Secret) -> usize {
        self.send(WatchEvent::new(WatchOp::Modified, secret))
    }

    /// Sends a "deleted" event for `secret`.
    pub fn send_deleted(&self, secret: Secret) -> usize {
        self.send(WatchEvent::new(WatchOp::Deleted, secret))
    }

    /// Subscribes to the feed. Events sent before subscription are not
    /// received.
    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Whether anyone is listening.
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Default for WatchBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WatchBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
