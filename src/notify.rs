//! Room event notifications
//!
//! Best-effort fan-out of room status changes to live subscribers. Events
//! are not persisted; a subscriber that lags simply misses them.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::RoomStatus;

/// Capacity of the event channel before slow subscribers start lagging
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A room status change
#[derive(Debug, Clone, Serialize)]
pub struct RoomEvent {
    pub room_code: String,
    pub status: RoomStatus,
    pub winner_id: Option<Uuid>,
}

/// Broadcast handle shared through application state
#[derive(Clone)]
pub struct RoomNotifier {
    tx: broadcast::Sender<RoomEvent>,
}

impl RoomNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to room events
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; absent subscribers are not an error
    pub fn publish(&self, event: RoomEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("No live subscribers for room event: {}", e.0.room_code);
        }
    }
}

impl Default for RoomNotifier {
    fn default() -> Self {
        Self::new()
    }
}
