//! In-memory session directory and user store

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use super::{SessionDirectory, UserStore};
use crate::error::DirectoryError;
use crate::types::{Client, LanguageId, RightSet, SessionData, User};

/// Session directory and user store backed by hash maps
#[derive(Default)]
pub struct MemoryDirectory {
    sessions: RwLock<HashMap<String, SessionData>>,
    clients: RwLock<HashMap<String, Client>>,
    rights: RwLock<HashMap<i64, RightSet>>,
    users: RwLock<HashMap<i64, User>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a login session for a user
    pub fn add_session(&self, session_id: impl Into<String>, user_id: i64) -> SessionData {
        let session = SessionData {
            session_id: session_id.into(),
            user_id,
        };
        self.sessions
            .write()
            .insert(session.session_id.clone(), session.clone());
        session
    }

    pub fn remove_session(&self, session_id: &str) {
        self.sessions.write().remove(session_id);
    }

    /// Register or replace a connected client, keyed by public id
    pub fn connect(&self, client: Client) {
        debug!(public_id = %client.public_id, room_id = ?client.room_id, "client connected");
        self.clients.write().insert(client.public_id.clone(), client);
    }

    pub fn disconnect(&self, public_id: &str) -> Option<Client> {
        self.clients.write().remove(public_id)
    }

    pub fn grant(&self, user_id: i64, rights: RightSet) {
        self.rights.write().insert(user_id, rights);
    }

    pub fn add_user(&self, user_id: i64, language_id: LanguageId) {
        self.users.write().insert(
            user_id,
            User {
                id: user_id,
                language_id,
            },
        );
    }

    /// Get active client count
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

impl SessionDirectory for MemoryDirectory {
    fn session(&self, session_id: &str) -> Option<SessionData> {
        self.sessions.read().get(session_id).cloned()
    }

    fn client_by_public_id(&self, public_id: &str) -> Option<Client> {
        self.clients.read().get(public_id).cloned()
    }

    fn update_client(&self, client: &Client) -> Result<(), DirectoryError> {
        let mut clients = self.clients.write();
        match clients.get_mut(&client.public_id) {
            Some(existing) => {
                *existing = client.clone();
                Ok(())
            }
            None => Err(DirectoryError::UnknownClient(client.public_id.clone())),
        }
    }

    fn rights_of(&self, user_id: i64) -> RightSet {
        self.rights.read().get(&user_id).cloned().unwrap_or_default()
    }
}

impl UserStore for MemoryDirectory {
    fn get(&self, user_id: i64) -> Option<User> {
        self.users.read().get(&user_id).cloned()
    }
}
