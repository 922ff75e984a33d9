//! Explicit caller context

use serde::{Deserialize, Serialize};

use super::{ClientId, RoomId};

/// Who is calling and from which room.
///
/// Resolved by the transport layer before an operation is dispatched; the
/// operations never look up the current connection on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    pub client_id: ClientId,
    pub room_id: RoomId,
}

impl CallerContext {
    pub fn new(client_id: impl Into<ClientId>, room_id: RoomId) -> Self {
        Self {
            client_id: client_id.into(),
            room_id,
        }
    }
}
