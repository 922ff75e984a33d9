//! Token registries backing the barriers

use std::collections::HashMap;

use crate::types::{ClientId, ObjectId, SyncToken};

/// Live room-reload tokens of one room, keyed by client
#[derive(Debug, Default)]
pub struct RoomSyncRegistry {
    tokens: HashMap<ClientId, SyncToken>,
}

impl RoomSyncRegistry {
    /// Insert a token, returning the one it replaced
    pub fn insert(&mut self, token: SyncToken) -> Option<SyncToken> {
        self.tokens.insert(token.client_id.clone(), token)
    }

    pub fn get(&self, client_id: &str) -> Option<&SyncToken> {
        self.tokens.get(client_id)
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.tokens.contains_key(client_id)
    }

    pub fn remove(&mut self, client_id: &str) -> Option<SyncToken> {
        self.tokens.remove(client_id)
    }

    /// Number of tokens still marked as initial loaders
    pub fn initial_loaders(&self) -> usize {
        self.tokens.values().filter(|t| t.is_initial_loader).count()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> Vec<SyncToken> {
        self.tokens.values().cloned().collect()
    }
}

/// Live object-load tokens of one room, keyed by object then client.
///
/// Objects without tokens are pruned, so [`ObjectSyncRegistry::total`] is the
/// room-wide number of outstanding object loads.
#[derive(Debug, Default)]
pub struct ObjectSyncRegistry {
    objects: HashMap<ObjectId, HashMap<ClientId, SyncToken>>,
}

impl ObjectSyncRegistry {
    pub fn insert(&mut self, object_id: &str, token: SyncToken) -> Option<SyncToken> {
        self.objects
            .entry(object_id.to_string())
            .or_default()
            .insert(token.client_id.clone(), token)
    }

    pub fn contains(&self, object_id: &str, client_id: &str) -> bool {
        self.objects
            .get(object_id)
            .is_some_and(|clients| clients.contains_key(client_id))
    }

    pub fn remove(&mut self, object_id: &str, client_id: &str) -> Option<SyncToken> {
        let clients = self.objects.get_mut(object_id)?;
        let token = clients.remove(client_id);
        if clients.is_empty() {
            self.objects.remove(object_id);
        }
        token
    }

    /// Remove the client's token from every object
    pub fn remove_client(&mut self, client_id: &str) -> Vec<SyncToken> {
        let removed: Vec<SyncToken> = self
            .objects
            .values_mut()
            .filter_map(|clients| clients.remove(client_id))
            .collect();
        self.objects.retain(|_, clients| !clients.is_empty());
        removed
    }

    /// Outstanding tokens across all objects of the room
    pub fn total(&self) -> usize {
        self.objects.values().map(HashMap::len).sum()
    }

    /// Outstanding tokens for one object
    pub fn pending_for(&self, object_id: &str) -> usize {
        self.objects.get(object_id).map_or(0, HashMap::len)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn tokens(&self) -> Vec<SyncToken> {
        self.objects
            .values()
            .flat_map(|clients| clients.values().cloned())
            .collect()
    }
}
