//! Whiteboard Store - per-room cache of whiteboards
//!
//! Every operation holds the room lock for its entire read-modify-write.
//! The store does not broadcast; the service layer announces new and renamed
//! boards after the call returns.

use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use crate::room::RoomTable;
use crate::types::{RoomId, Whiteboard, WhiteboardCollection, WhiteboardId};

#[derive(Default)]
pub struct WhiteboardStore {
    rooms: RoomTable<WhiteboardCollection>,
}

impl WhiteboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board under a fresh id
    pub fn allocate(&self, room_id: RoomId, name: &str) -> WhiteboardId {
        let id = self.rooms.with_room(room_id, |boards| boards.allocate(name));
        debug!(room_id, board_id = id, board_name = name, "whiteboard allocated");
        id
    }

    /// Create one board if the room has none.
    ///
    /// `default_name` runs under the room lock and only when a board is
    /// actually created, so it must not block. Returns the new id, or `None`
    /// if the room already had boards.
    pub fn ensure_default<F>(&self, room_id: RoomId, default_name: F) -> Option<WhiteboardId>
    where
        F: FnOnce() -> String,
    {
        let created = self.rooms.with_room(room_id, |boards| {
            boards.is_empty().then(|| boards.allocate(default_name()))
        });
        if let Some(id) = created {
            debug!(room_id, board_id = id, "default whiteboard created");
        }
        created
    }

    /// Boards of the room, newest first
    pub fn list(&self, room_id: RoomId) -> Vec<(WhiteboardId, Whiteboard)> {
        self.rooms.with_room(room_id, |boards| boards.newest_first())
    }

    /// Number of boards in the room
    pub fn count(&self, room_id: RoomId) -> usize {
        self.rooms
            .with_existing(room_id, |boards| boards.len())
            .unwrap_or(0)
    }

    pub fn get(&self, room_id: RoomId, id: WhiteboardId) -> Option<Whiteboard> {
        self.rooms
            .with_existing(room_id, |boards| boards.get(id).cloned())
            .flatten()
    }

    pub fn rename(&self, room_id: RoomId, id: WhiteboardId, name: &str) -> SyncResult<()> {
        let renamed = self.rooms.with_room(room_id, |boards| match boards.get_mut(id) {
            Some(board) => {
                board.name = name.to_string();
                true
            }
            None => false,
        });

        if !renamed {
            warn!(room_id, board_id = id, "rename of unknown whiteboard");
            return Err(SyncError::BoardNotFound {
                room_id,
                board_id: id,
            });
        }
        debug!(room_id, board_id = id, board_name = name, "whiteboard renamed");
        Ok(())
    }

    pub fn delete(&self, room_id: RoomId, id: WhiteboardId) -> SyncResult<Whiteboard> {
        match self.rooms.with_room(room_id, |boards| boards.remove(id)) {
            Some(board) => {
                debug!(room_id, board_id = id, "whiteboard deleted");
                Ok(board)
            }
            None => {
                warn!(room_id, board_id = id, "delete of unknown whiteboard");
                Err(SyncError::BoardNotFound {
                    room_id,
                    board_id: id,
                })
            }
        }
    }

    /// Forget every board of the room
    pub fn drop_room(&self, room_id: RoomId) -> bool {
        self.rooms.remove(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_allocate_delete_scenario() {
        let store = WhiteboardStore::new();
        assert_eq!(store.allocate(1, "Board 1"), 1);
        assert_eq!(store.allocate(1, "Board 2"), 2);

        assert!(store.delete(1, 1).is_ok());
        let err = store.delete(1, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_rooms_have_independent_ids() {
        let store = WhiteboardStore::new();
        assert_eq!(store.allocate(1, "a"), 1);
        assert_eq!(store.allocate(2, "b"), 1);
        assert_eq!(store.allocate(1, "c"), 2);
    }

    #[test]
    fn test_ensure_default_is_idempotent() {
        let store = WhiteboardStore::new();
        assert_eq!(store.ensure_default(1, || "Default".to_string()), Some(1));
        assert_eq!(
            store.ensure_default(1, || panic!("name resolved for non-empty room")),
            None
        );
        assert_eq!(store.list(1), vec![(1, Whiteboard::new(1, "Default"))]);
    }

    #[test]
    fn test_rename() {
        let store = WhiteboardStore::new();
        let id = store.allocate(1, "old");

        store.rename(1, id, "new").unwrap();
        assert_eq!(store.get(1, id).unwrap().name, "new");

        let err = store.rename(1, 99, "x").unwrap_err();
        assert_eq!(
            err,
            SyncError::BoardNotFound {
                room_id: 1,
                board_id: 99
            }
        );
    }

    #[test]
    fn test_list_newest_first() {
        let store = WhiteboardStore::new();
        store.allocate(1, "a");
        store.allocate(1, "b");
        store.allocate(1, "c");
        store.delete(1, 2).unwrap();

        let ids: Vec<WhiteboardId> = store.list(1).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_drop_room() {
        let store = WhiteboardStore::new();
        store.allocate(1, "a");

        assert_eq!(store.count(1), 1);
        assert!(store.drop_room(1));
        assert!(store.get(1, 1).is_none());
        assert_eq!(store.count(1), 0);
        assert_eq!(store.allocate(1, "b"), 1);
    }
}
