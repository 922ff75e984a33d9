//! Keyed state with one lock per key
//!
//! Every component keeps its room-scoped state in a [`RoomTable`]. All
//! reads and writes of a room's state go through [`RoomTable::with_room`] or
//! [`RoomTable::with_existing`], which run the closure while holding that
//! room's mutex, so a read-modify-write sequence is atomic with respect to
//! every other caller in the same room. Different rooms never contend.
//!
//! Tables are keyed by room id unless another key is given; the capability
//! gate keys one by target client.
//!
//! Closures must not call the broadcaster. They return what should be
//! emitted and the caller emits after the lock is released.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::types::RoomId;

/// Map from key to lock-guarded state
pub struct RoomTable<T, K = RoomId> {
    rooms: RwLock<HashMap<K, Arc<Mutex<T>>>>,
}

impl<T: Default, K: Eq + Hash> RoomTable<T, K> {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Get or lazily create the state under a key
    fn room(&self, key: K) -> Arc<Mutex<T>> {
        // Fast path: read lock
        if let Some(room) = self.rooms.read().get(&key) {
            return Arc::clone(room);
        }

        let mut rooms = self.rooms.write();
        Arc::clone(rooms.entry(key).or_default())
    }

    /// Run `f` on the state under its lock, creating the state if needed
    pub fn with_room<R>(&self, key: K, f: impl FnOnce(&mut T) -> R) -> R {
        let room = self.room(key);
        let mut state = room.lock();
        f(&mut state)
    }

    /// Run `f` under the lock only if the state already exists
    pub fn with_existing<R>(&self, key: K, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let room = self.rooms.read().get(&key).map(Arc::clone)?;
        let mut state = room.lock();
        Some(f(&mut state))
    }

    /// Drop the state under a key. Returns true if it existed.
    pub fn remove(&self, key: K) -> bool {
        self.rooms.write().remove(&key).is_some()
    }

    pub fn contains(&self, key: K) -> bool {
        self.rooms.read().contains_key(&key)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }
}

impl<T: Default, K: Eq + Hash> Default for RoomTable<T, K> {
    fn default() -> Self {
        Self::new()
    }
}
