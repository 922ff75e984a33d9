//! Broadcaster that records events instead of delivering them

use std::collections::HashSet;

use parking_lot::Mutex;

use super::broadcaster::Broadcaster;
use super::events::RoomEvent;
use crate::types::RoomId;

/// Keeps every emitted event in emission order.
///
/// Rooms have listeners unless they were explicitly marked silent with
/// [`RecordingBroadcaster::silence_room`].
#[derive(Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<(RoomId, RoomEvent)>>,
    silent_rooms: Mutex<HashSet<RoomId>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events emitted so far
    pub fn events(&self) -> Vec<(RoomId, RoomEvent)> {
        self.events.lock().clone()
    }

    /// Events emitted to one room with the given wire name
    pub fn events_named(&self, room_id: RoomId, name: &str) -> Vec<RoomEvent> {
        self.events
            .lock()
            .iter()
            .filter(|(room, event)| *room == room_id && event.name() == name)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn count_named(&self, room_id: RoomId, name: &str) -> usize {
        self.events_named(room_id, name).len()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Make `has_listeners` report false for the room
    pub fn silence_room(&self, room_id: RoomId) {
        self.silent_rooms.lock().insert(room_id);
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn send_to_room(&self, room_id: RoomId, event: RoomEvent) {
        self.events.lock().push((room_id, event));
    }

    fn has_listeners(&self, room_id: RoomId) -> bool {
        !self.silent_rooms.lock().contains(&room_id)
    }
}
