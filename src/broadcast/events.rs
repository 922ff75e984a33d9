//! Room events and their wire names

use serde::{Deserialize, Serialize};

use crate::types::{Client, RoomId, SyncToken, WhiteboardId};

/// Marker carried by `sendImagesSyncCompleteFlag` when a disconnect cleared the last object load
pub const IMAGES_SYNC_REMOVE_MARKER: &str = "remove";

/// Events delivered to every client of a room.
///
/// The variant names are the event names existing clients listen for and
/// must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum RoomEvent {
    NewWhiteboard { id: WhiteboardId, name: String },
    RenameWhiteboard { id: WhiteboardId, name: String },

    /// Draw, share and remote-control changes all use this event
    UpdateDrawStatus { client: Client },
    UpdateGiveAudioStatus { client: Client },

    SendSyncFlag { token: SyncToken },
    SendSyncCompleteFlag { token: SyncToken },
    SendObjectSyncFlag { token: SyncToken },
    SendObjectSyncCompleteFlag { token: SyncToken },
    SendImagesSyncCompleteFlag { marker: String },
}

impl RoomEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::NewWhiteboard { .. } => "newWhiteboard",
            RoomEvent::RenameWhiteboard { .. } => "renameWhiteboard",
            RoomEvent::UpdateDrawStatus { .. } => "updateDrawStatus",
            RoomEvent::UpdateGiveAudioStatus { .. } => "updateGiveAudioStatus",
            RoomEvent::SendSyncFlag { .. } => "sendSyncFlag",
            RoomEvent::SendSyncCompleteFlag { .. } => "sendSyncCompleteFlag",
            RoomEvent::SendObjectSyncFlag { .. } => "sendObjectSyncFlag",
            RoomEvent::SendObjectSyncCompleteFlag { .. } => "sendObjectSyncCompleteFlag",
            RoomEvent::SendImagesSyncCompleteFlag { .. } => "sendImagesSyncCompleteFlag",
        }
    }
}

/// Room event wrapper with delivery metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessage {
    pub room_id: RoomId,

    #[serde(flatten)]
    pub event: RoomEvent,

    /// Monotonically increasing sequence ID for gap detection
    pub sequence_id: u64,

    /// Unix timestamp when the event was created
    pub timestamp: i64,
}

impl RoomMessage {
    /// Serialize to a single JSON frame for the transport
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_uses_wire_name() {
        let event = RoomEvent::NewWhiteboard {
            id: 3,
            name: "Sketch".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "newWhiteboard");
        assert_eq!(json["payload"]["id"], 3);
        assert_eq!(json["payload"]["name"], "Sketch");
    }

    #[test]
    fn test_name_matches_serde_tag() {
        let token = SyncToken::room_load(1, "a");
        let events = vec![
            RoomEvent::RenameWhiteboard { id: 1, name: "x".to_string() },
            RoomEvent::UpdateGiveAudioStatus { client: Client::new("a", 1) },
            RoomEvent::SendSyncFlag { token: token.clone() },
            RoomEvent::SendSyncCompleteFlag { token: token.clone() },
            RoomEvent::SendObjectSyncFlag { token: token.clone() },
            RoomEvent::SendObjectSyncCompleteFlag { token },
            RoomEvent::SendImagesSyncCompleteFlag {
                marker: IMAGES_SYNC_REMOVE_MARKER.to_string(),
            },
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }

    #[test]
    fn test_room_message_serialization() {
        let msg = RoomMessage {
            room_id: 9,
            event: RoomEvent::SendImagesSyncCompleteFlag {
                marker: "remove".to_string(),
            },
            sequence_id: 42,
            timestamp: 1234567890,
        };

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"sequenceId\":42"));
        assert!(json.contains("sendImagesSyncCompleteFlag"));

        let parsed = RoomMessage::from_json(&json).unwrap();
        assert_eq!(parsed.event, msg.event);
        assert_eq!(parsed.room_id, 9);
    }
}
