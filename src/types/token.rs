//! Barrier participation token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClientId, ObjectId, RoomId};

/// One client's outstanding participation in a barrier round.
///
/// Tokens are broadcast verbatim inside the `sendSyncFlag` family of events,
/// hence the camelCase wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncToken {
    pub client_id: ClientId,
    pub room_id: RoomId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub is_initial_loader: bool,
    pub is_currently_loading: bool,
}

impl SyncToken {
    /// Token for a full whiteboard reload
    pub fn room_load(room_id: RoomId, client_id: impl Into<ClientId>) -> Self {
        Self {
            client_id: client_id.into(),
            room_id,
            object_id: None,
            created_at: Utc::now(),
            is_initial_loader: true,
            is_currently_loading: true,
        }
    }

    /// Token for loading one embedded object.
    ///
    /// `is_initiator` marks the client that triggered the load, as opposed to
    /// clients that were asked to load the object as well.
    pub fn object_load(
        room_id: RoomId,
        object_id: impl Into<ObjectId>,
        client_id: impl Into<ClientId>,
        is_initiator: bool,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            room_id,
            object_id: Some(object_id.into()),
            created_at: Utc::now(),
            is_initial_loader: is_initiator,
            is_currently_loading: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_load_token_flags() {
        let token = SyncToken::room_load(7, "alice");
        assert!(token.is_initial_loader);
        assert!(token.is_currently_loading);
        assert_eq!(token.object_id, None);
    }

    #[test]
    fn test_token_wire_names() {
        let token = SyncToken::object_load(7, "img-1", "bob", false);
        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(json["clientId"], "bob");
        assert_eq!(json["roomId"], 7);
        assert_eq!(json["objectId"], "img-1");
        assert_eq!(json["isInitialLoader"], false);
        assert_eq!(json["isCurrentlyLoading"], true);
        assert!(json.get("createdAt").is_some());
    }
}
