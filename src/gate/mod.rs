//! Capability gate
//!
//! Moderators grant or revoke draw, share, remote-control and give-audio
//! capabilities of other clients. A change is applied to a copy of the
//! target's record, persisted through the session directory and only then
//! announced, so a failure at any step leaves nothing half-applied.
//!
//! Resolving, applying and persisting run under a per-target lock. Two
//! changes to the same client are serialized, so neither overwrites the
//! other's flag with a stale record.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::broadcast::{Broadcaster, RoomEvent};
use crate::directory::SessionDirectory;
use crate::error::{SyncError, SyncResult};
use crate::room::RoomTable;
use crate::types::{CallerContext, Capability, Client, ClientId};

pub struct CapabilityGate {
    directory: Arc<dyn SessionDirectory>,
    broadcaster: Arc<dyn Broadcaster>,
    targets: RoomTable<(), ClientId>,
}

impl CapabilityGate {
    pub fn new(directory: Arc<dyn SessionDirectory>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            directory,
            broadcaster,
            targets: RoomTable::new(),
        }
    }

    /// Set one capability of the target client.
    ///
    /// The caller needs a valid session with user-level rights and must be a
    /// moderator. Returns the updated target record.
    pub fn set_capability(
        &self,
        caller: &CallerContext,
        session_id: &str,
        target_public_id: &str,
        capability: Capability,
        value: bool,
    ) -> SyncResult<Client> {
        debug!(
            caller = %caller.client_id,
            target_id = target_public_id,
            ?capability,
            value,
            "capability change requested"
        );

        self.authorize(caller, session_id)?;

        let target = self
            .targets
            .with_room(target_public_id.to_string(), |_| {
                self.apply(target_public_id, capability, value)
            })?;

        let event = match capability {
            Capability::GiveAudio => RoomEvent::UpdateGiveAudioStatus {
                client: target.clone(),
            },
            Capability::Draw | Capability::Share | Capability::RemoteControl => {
                RoomEvent::UpdateDrawStatus {
                    client: target.clone(),
                }
            }
        };
        self.broadcaster.send_to_room(caller.room_id, event);
        Ok(target)
    }

    /// Resolve, change and persist the target record. Runs under the target lock.
    fn apply(&self, target_public_id: &str, capability: Capability, value: bool) -> SyncResult<Client> {
        let Some(mut target) = self.directory.client_by_public_id(target_public_id) else {
            warn!(target_id = target_public_id, "capability change for unknown client");
            return Err(SyncError::ClientNotFound(target_public_id.to_string()));
        };

        capability.set(&mut target.capabilities, value);
        if let Err(err) = self.directory.update_client(&target) {
            error!(target_id = target_public_id, %err, "failed to persist capability change");
            return Err(err.into());
        }
        Ok(target)
    }

    /// Check the session rights and moderator status of the caller
    fn authorize(&self, caller: &CallerContext, session_id: &str) -> SyncResult<()> {
        let Some(session) = self.directory.session(session_id) else {
            warn!(caller = %caller.client_id, "capability change with invalid session");
            return Err(SyncError::Unauthorized("invalid session".to_string()));
        };

        if !self.directory.rights_of(session.user_id).has_user_level() {
            warn!(caller = %caller.client_id, user_id = session.user_id, "caller lacks user level");
            return Err(SyncError::Unauthorized(
                "user level rights required".to_string(),
            ));
        }

        let is_moderator = self
            .directory
            .client_by_public_id(&caller.client_id)
            .is_some_and(|client| client.is_moderator);
        if !is_moderator {
            warn!(caller = %caller.client_id, "capability change by non-moderator");
            return Err(SyncError::Unauthorized("moderator required".to_string()));
        }
        Ok(())
    }
}
