//! Connected clients, their capabilities and the rights of their users

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ClientId, LanguageId, RoomId};

/// Boolean permissions attached to a connected client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCapabilities {
    pub can_draw: bool,
    pub can_share: bool,
    pub can_remote_control: bool,
    pub can_give_audio: bool,
}

/// A single capability that a moderator can grant or revoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Draw,
    Share,
    RemoteControl,
    GiveAudio,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Draw,
        Capability::Share,
        Capability::RemoteControl,
        Capability::GiveAudio,
    ];

    pub fn get(self, caps: &ClientCapabilities) -> bool {
        match self {
            Capability::Draw => caps.can_draw,
            Capability::Share => caps.can_share,
            Capability::RemoteControl => caps.can_remote_control,
            Capability::GiveAudio => caps.can_give_audio,
        }
    }

    pub fn set(self, caps: &mut ClientCapabilities, value: bool) {
        match self {
            Capability::Draw => caps.can_draw = value,
            Capability::Share => caps.can_share = value,
            Capability::RemoteControl => caps.can_remote_control = value,
            Capability::GiveAudio => caps.can_give_audio = value,
        }
    }
}

/// A connected client as known to the session directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub public_id: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    /// Negative ids denote users from an external user source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub is_moderator: bool,
    #[serde(flatten)]
    pub capabilities: ClientCapabilities,
}

impl Client {
    pub fn new(public_id: impl Into<ClientId>, room_id: RoomId) -> Self {
        Self {
            public_id: public_id.into(),
            room_id: Some(room_id),
            user_id: None,
            is_moderator: false,
            capabilities: ClientCapabilities::default(),
        }
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn moderator(mut self) -> Self {
        self.is_moderator = true;
        self
    }
}

/// Application-level rights of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Right {
    Admin,
    GroupAdmin,
    Room,
    Dashboard,
    Login,
    Soap,
}

/// Set of rights granted to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightSet(HashSet<Right>);

impl RightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, right: Right) -> bool {
        self.0.contains(&right)
    }

    /// User level means the user may enter rooms
    pub fn has_user_level(&self) -> bool {
        self.contains(Right::Room)
    }
}

impl FromIterator<Right> for RightSet {
    fn from_iter<I: IntoIterator<Item = Right>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A validated login session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub session_id: String,
    pub user_id: i64,
}

/// User record, only the language preference matters here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub language_id: LanguageId,
}
