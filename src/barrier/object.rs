//! Embedded object load barrier

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::registry::ObjectSyncRegistry;
use crate::broadcast::events::IMAGES_SYNC_REMOVE_MARKER;
use crate::broadcast::{Broadcaster, RoomEvent};
use crate::config::RestartPolicy;
use crate::error::{SyncError, SyncResult};
use crate::room::RoomTable;
use crate::types::{RoomId, SyncToken};

/// Result of a successful object `complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectSyncOutcome {
    /// No object loads remain in the room; `sendObjectSyncCompleteFlag` was emitted
    Done,
    /// Loads of this or other objects are still outstanding
    Pending,
}

impl ObjectSyncOutcome {
    /// Legacy numeric result code understood by existing clients
    pub fn code(self) -> i32 {
        match self {
            ObjectSyncOutcome::Done => 1,
            ObjectSyncOutcome::Pending => -4,
        }
    }
}

/// Map a completion result onto the legacy codes: 1, -4, -2 or -1
pub fn outcome_code(result: &SyncResult<ObjectSyncOutcome>) -> i32 {
    match result {
        Ok(outcome) => outcome.code(),
        Err(err) => err.code(),
    }
}

/// Barrier for clients loading embedded objects.
///
/// Completion is judged across every object of the room: one loading
/// indicator per room, cleared only when no client is loading any object.
pub struct ObjectSyncBarrier {
    rooms: RoomTable<ObjectSyncRegistry>,
    broadcaster: Arc<dyn Broadcaster>,
    policy: RestartPolicy,
}

impl ObjectSyncBarrier {
    pub fn new(broadcaster: Arc<dyn Broadcaster>, policy: RestartPolicy) -> Self {
        Self {
            rooms: RoomTable::new(),
            broadcaster,
            policy,
        }
    }

    /// Register the client as loading the object.
    ///
    /// Only the initiator's start is announced, so the loading splash is
    /// shown once per load rather than once per client.
    pub fn start(
        &self,
        room_id: RoomId,
        object_id: &str,
        client_id: &str,
        is_initiator: bool,
    ) -> SyncResult<SyncToken> {
        debug!(room_id, object_id, client_id, is_initiator, "object sync start");
        let token = SyncToken::object_load(room_id, object_id, client_id, is_initiator);

        self.rooms.with_room(room_id, |registry| {
            if self.policy == RestartPolicy::Reject && registry.contains(object_id, client_id) {
                return Err(SyncError::AlreadyStarted {
                    room_id,
                    client_id: client_id.to_string(),
                });
            }
            registry.insert(object_id, token.clone());
            Ok(())
        })
        .inspect_err(|_| warn!(room_id, object_id, client_id, "object sync already in progress"))?;

        if is_initiator {
            self.broadcaster.send_to_room(
                room_id,
                RoomEvent::SendObjectSyncFlag {
                    token: token.clone(),
                },
            );
        }
        Ok(token)
    }

    /// Report that the client finished loading the object
    pub fn complete(
        &self,
        room_id: RoomId,
        object_id: &str,
        client_id: &str,
    ) -> SyncResult<ObjectSyncOutcome> {
        let removed = self
            .rooms
            .with_existing(room_id, |registry| {
                registry
                    .remove(object_id, client_id)
                    .map(|token| (token, registry.total()))
            })
            .flatten();

        let Some((token, remaining)) = removed else {
            warn!(room_id, object_id, client_id, "no object sync token for client");
            return Err(SyncError::TokenNotFound {
                room_id,
                object_id: object_id.to_string(),
                client_id: client_id.to_string(),
            });
        };

        if remaining > 0 {
            debug!(room_id, object_id, client_id, remaining, "object loads outstanding");
            return Ok(ObjectSyncOutcome::Pending);
        }

        info!(room_id, object_id, client_id, "object sync complete");
        self.broadcaster
            .send_to_room(room_id, RoomEvent::SendObjectSyncCompleteFlag { token });
        Ok(ObjectSyncOutcome::Done)
    }

    /// Drop every object token of the client on disconnect.
    ///
    /// Safe for clients that never started. Returns the removed tokens.
    pub fn leave(&self, room_id: RoomId, client_id: &str) -> Vec<SyncToken> {
        let (removed, remaining) = self
            .rooms
            .with_existing(room_id, |registry| {
                let removed = registry.remove_client(client_id);
                (removed, registry.total())
            })
            .unwrap_or_default();

        if removed.is_empty() {
            return removed;
        }
        debug!(room_id, client_id, dropped = removed.len(), remaining, "object loader left");

        if remaining == 0 && self.broadcaster.has_listeners(room_id) {
            info!(room_id, client_id, "all object loads complete after disconnect");
            self.broadcaster.send_to_room(
                room_id,
                RoomEvent::SendImagesSyncCompleteFlag {
                    marker: IMAGES_SYNC_REMOVE_MARKER.to_string(),
                },
            );
        }
        removed
    }

    /// Tokens still outstanding across all objects of the room
    pub fn pending(&self, room_id: RoomId) -> Vec<SyncToken> {
        self.rooms
            .with_existing(room_id, |registry| registry.tokens())
            .unwrap_or_default()
    }

    /// Number of clients still loading one object
    pub fn pending_for(&self, room_id: RoomId, object_id: &str) -> usize {
        self.rooms
            .with_existing(room_id, |registry| registry.pending_for(object_id))
            .unwrap_or(0)
    }

    pub fn drop_room(&self, room_id: RoomId) -> bool {
        self.rooms.remove(room_id)
    }
}
