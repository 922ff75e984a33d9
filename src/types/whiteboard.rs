//! Whiteboard and per-room whiteboard collection

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::WhiteboardId;

/// A single whiteboard in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whiteboard {
    pub id: WhiteboardId,
    pub name: String,
}

impl Whiteboard {
    pub fn new(id: WhiteboardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// All whiteboards of one room.
///
/// Ids come from `last_id`, which only grows, so an id is never handed out
/// twice even after the board holding the highest id has been deleted.
#[derive(Debug, Clone, Default)]
pub struct WhiteboardCollection {
    boards: BTreeMap<WhiteboardId, Whiteboard>,
    last_id: WhiteboardId,
}

impl WhiteboardCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new board under a fresh id and return that id
    pub fn allocate(&mut self, name: impl Into<String>) -> WhiteboardId {
        self.last_id += 1;
        let id = self.last_id;
        self.boards.insert(id, Whiteboard::new(id, name));
        id
    }

    pub fn get(&self, id: WhiteboardId) -> Option<&Whiteboard> {
        self.boards.get(&id)
    }

    pub fn get_mut(&mut self, id: WhiteboardId) -> Option<&mut Whiteboard> {
        self.boards.get_mut(&id)
    }

    pub fn remove(&mut self, id: WhiteboardId) -> Option<Whiteboard> {
        self.boards.remove(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Boards ordered by id descending (most recently created first)
    pub fn newest_first(&self) -> Vec<(WhiteboardId, Whiteboard)> {
        self.boards
            .iter()
            .rev()
            .map(|(id, board)| (*id, board.clone()))
            .collect()
    }
}
