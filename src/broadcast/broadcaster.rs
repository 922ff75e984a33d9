//! Broadcaster trait and the tokio channel implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::trace;

use super::events::{RoomEvent, RoomMessage};
use crate::types::RoomId;

/// Delivers room events to connected clients.
///
/// Sending is fire-and-forget: implementations must not block and must not
/// report delivery failures back to the caller.
pub trait Broadcaster: Send + Sync {
    /// Send an event to every client listening on the room
    fn send_to_room(&self, room_id: RoomId, event: RoomEvent);

    /// Whether the room scope still exists and has at least one listener
    fn has_listeners(&self, room_id: RoomId) -> bool;

    /// Tear down the room scope once the room is closed
    fn release_room(&self, _room_id: RoomId) {}
}

/// One broadcast channel per room.
///
/// Each subscriber gets an independent receiver buffering up to `capacity`
/// messages; slow subscribers lag and must resynchronise.
pub struct ChannelBroadcaster {
    rooms: RwLock<HashMap<RoomId, broadcast::Sender<RoomMessage>>>,
    capacity: usize,
    sequence_counter: AtomicU64,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Subscribe to a room, creating its channel if needed
    pub fn subscribe(&self, room_id: RoomId) -> broadcast::Receiver<RoomMessage> {
        if let Some(sender) = self.rooms.read().get(&room_id) {
            return sender.subscribe();
        }

        let mut rooms = self.rooms.write();
        rooms
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drop a room's channel; receivers see the channel closed
    pub fn close_room(&self, room_id: RoomId) -> bool {
        self.rooms.write().remove(&room_id).is_some()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn send_to_room(&self, room_id: RoomId, event: RoomEvent) {
        let rooms = self.rooms.read();
        let Some(sender) = rooms.get(&room_id) else {
            trace!(room_id, event = event.name(), "no channel for room, event dropped");
            return;
        };

        let msg = RoomMessage {
            room_id,
            event,
            sequence_id: self.sequence_counter.fetch_add(1, Ordering::SeqCst),
            timestamp: chrono::Utc::now().timestamp(),
        };

        // Ignore send errors - they just mean no receivers are listening
        let _ = sender.send(msg);
    }

    fn has_listeners(&self, room_id: RoomId) -> bool {
        self.rooms
            .read()
            .get(&room_id)
            .is_some_and(|sender| sender.receiver_count() > 0)
    }

    fn release_room(&self, room_id: RoomId) {
        self.close_room(room_id);
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(1024)
    }
}
