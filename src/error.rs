//! Error types

use thiserror::Error;

use crate::types::{ClientId, ObjectId, RoomId, WhiteboardId};

/// Result type for whiteboard and barrier operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Coarse failure classes reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidState,
    Internal,
}

/// Errors returned by the store, the barriers and the capability gate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("whiteboard {board_id} not found in room {room_id}")]
    BoardNotFound {
        room_id: RoomId,
        board_id: WhiteboardId,
    },

    #[error("no sync token for client {client_id} on object {object_id} in room {room_id}")]
    TokenNotFound {
        room_id: RoomId,
        object_id: ObjectId,
        client_id: ClientId,
    },

    #[error("client {0} not found")]
    ClientNotFound(ClientId),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("client {client_id} has no sync in progress in room {room_id}")]
    NotStarted { room_id: RoomId, client_id: ClientId },

    #[error("sync for client {client_id} in room {room_id} is not loading yet")]
    NotYetLoading { room_id: RoomId, client_id: ClientId },

    #[error("client {client_id} already has a sync in progress in room {room_id}")]
    AlreadyStarted { room_id: RoomId, client_id: ClientId },

    #[error("internal error: {0}")]
    Internal(String),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::BoardNotFound { .. }
            | SyncError::TokenNotFound { .. }
            | SyncError::ClientNotFound(_) => ErrorKind::NotFound,
            SyncError::Unauthorized(_) => ErrorKind::Unauthorized,
            SyncError::NotStarted { .. }
            | SyncError::NotYetLoading { .. }
            | SyncError::AlreadyStarted { .. } => ErrorKind::InvalidState,
            SyncError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Legacy numeric result code understood by existing clients
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => -2,
            _ => -1,
        }
    }
}

/// Failures reported by external collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("client {0} is not registered")]
    UnknownClient(ClientId),

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for SyncError {
    fn from(err: DirectoryError) -> Self {
        SyncError::Internal(err.to_string())
    }
}
