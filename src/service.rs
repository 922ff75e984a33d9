//! Whiteboard service
//!
//! Per-client entry points bound to an explicit [`CallerContext`]. The
//! transport layer resolves the caller and dispatches here; every operation
//! returns a typed result instead of collapsing failures to `false`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::barrier::{CompleteOutcome, ObjectSyncBarrier, ObjectSyncOutcome, SyncBarrier};
use crate::broadcast::{Broadcaster, ChannelBroadcaster, RoomEvent};
use crate::config::SyncConfig;
use crate::directory::{LabelLookup, SessionDirectory, UserStore};
use crate::error::SyncResult;
use crate::gate::CapabilityGate;
use crate::store::WhiteboardStore;
use crate::types::{
    CallerContext, Capability, Client, LanguageId, RoomId, SyncToken, Whiteboard, WhiteboardId,
};

pub struct WhiteboardService {
    store: WhiteboardStore,
    sync: SyncBarrier,
    object_sync: ObjectSyncBarrier,
    gate: CapabilityGate,
    directory: Arc<dyn SessionDirectory>,
    users: Arc<dyn UserStore>,
    labels: Arc<dyn LabelLookup>,
    broadcaster: Arc<dyn Broadcaster>,
    config: SyncConfig,
}

impl WhiteboardService {
    pub fn new(
        config: SyncConfig,
        directory: Arc<dyn SessionDirectory>,
        users: Arc<dyn UserStore>,
        labels: Arc<dyn LabelLookup>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        info!(restart_policy = ?config.restart_policy, "whiteboard service ready");
        Self {
            store: WhiteboardStore::new(),
            sync: SyncBarrier::new(broadcaster.clone(), config.restart_policy),
            object_sync: ObjectSyncBarrier::new(broadcaster.clone(), config.restart_policy),
            gate: CapabilityGate::new(directory.clone(), broadcaster.clone()),
            directory,
            users,
            labels,
            broadcaster,
            config,
        }
    }

    /// Build a service that fans events out over tokio broadcast channels.
    ///
    /// Returns the channel broadcaster as well so the transport can subscribe
    /// connections to their rooms.
    pub fn with_channels(
        config: SyncConfig,
        directory: Arc<dyn SessionDirectory>,
        users: Arc<dyn UserStore>,
        labels: Arc<dyn LabelLookup>,
    ) -> (Self, Arc<ChannelBroadcaster>) {
        let channels = Arc::new(ChannelBroadcaster::new(config.broadcast_capacity));
        let service = Self::new(config, directory, users, labels, channels.clone());
        (service, channels)
    }

    // ========================================================================
    // Whiteboards
    // ========================================================================

    /// Create a board in the caller's room and announce it
    pub fn allocate_board(&self, ctx: &CallerContext, name: &str) -> WhiteboardId {
        let id = self.store.allocate(ctx.room_id, name);
        self.broadcaster.send_to_room(
            ctx.room_id,
            RoomEvent::NewWhiteboard {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn delete_board(&self, ctx: &CallerContext, id: WhiteboardId) -> SyncResult<Whiteboard> {
        self.store.delete(ctx.room_id, id)
    }

    /// Boards of the caller's room, newest first.
    ///
    /// An empty room gets one default board named in the caller's language.
    pub fn list_boards(&self, ctx: &CallerContext) -> Vec<(WhiteboardId, Whiteboard)> {
        if self.store.count(ctx.room_id) == 0 {
            let name = self.default_board_name(ctx);
            // Another caller may have filled the room since the check
            if let Some(id) = self.store.ensure_default(ctx.room_id, || name) {
                debug!(room_id = ctx.room_id, board_id = id, "initialised room whiteboards");
            }
        }
        self.store.list(ctx.room_id)
    }

    /// Rename a board and announce the new name
    pub fn rename_board(&self, ctx: &CallerContext, id: WhiteboardId, name: &str) -> SyncResult<()> {
        self.store.rename(ctx.room_id, id, name)?;
        self.broadcaster.send_to_room(
            ctx.room_id,
            RoomEvent::RenameWhiteboard {
                id,
                name: name.to_string(),
            },
        );
        Ok(())
    }

    fn default_board_name(&self, ctx: &CallerContext) -> String {
        let language = self.caller_language(ctx);
        self.labels
            .label(&self.config.default_board_label, language)
            .unwrap_or_else(|| self.config.default_board_name.clone())
    }

    /// Language of the caller's user, falling back to the configured default.
    ///
    /// Negative user ids denote external users and are looked up by their
    /// absolute value.
    fn caller_language(&self, ctx: &CallerContext) -> LanguageId {
        self.directory
            .client_by_public_id(&ctx.client_id)
            .and_then(|client| client.user_id)
            .and_then(|user_id| self.users.get(user_id.saturating_abs()))
            .map(|user| user.language_id)
            .unwrap_or(self.config.default_language)
    }

    // ========================================================================
    // Capabilities
    // ========================================================================

    pub fn set_can_draw(
        &self,
        ctx: &CallerContext,
        session_id: &str,
        target_public_id: &str,
        value: bool,
    ) -> SyncResult<Client> {
        self.gate
            .set_capability(ctx, session_id, target_public_id, Capability::Draw, value)
    }

    pub fn set_can_share(
        &self,
        ctx: &CallerContext,
        session_id: &str,
        target_public_id: &str,
        value: bool,
    ) -> SyncResult<Client> {
        self.gate
            .set_capability(ctx, session_id, target_public_id, Capability::Share, value)
    }

    pub fn set_can_remote_control(
        &self,
        ctx: &CallerContext,
        session_id: &str,
        target_public_id: &str,
        value: bool,
    ) -> SyncResult<Client> {
        self.gate.set_capability(
            ctx,
            session_id,
            target_public_id,
            Capability::RemoteControl,
            value,
        )
    }

    pub fn set_can_give_audio(
        &self,
        ctx: &CallerContext,
        session_id: &str,
        target_public_id: &str,
        value: bool,
    ) -> SyncResult<Client> {
        self.gate.set_capability(
            ctx,
            session_id,
            target_public_id,
            Capability::GiveAudio,
            value,
        )
    }

    // ========================================================================
    // Load barriers
    // ========================================================================

    pub fn start_sync(&self, ctx: &CallerContext) -> SyncResult<SyncToken> {
        self.sync.start(ctx.room_id, &ctx.client_id)
    }

    pub fn complete_sync(&self, ctx: &CallerContext) -> SyncResult<CompleteOutcome> {
        self.sync.complete(ctx.room_id, &ctx.client_id)
    }

    pub fn start_object_sync(
        &self,
        ctx: &CallerContext,
        object_id: &str,
        is_initiator: bool,
    ) -> SyncResult<SyncToken> {
        self.object_sync
            .start(ctx.room_id, object_id, &ctx.client_id, is_initiator)
    }

    /// Use [`crate::barrier::outcome_code`] for the legacy numeric result
    pub fn complete_object_sync(
        &self,
        ctx: &CallerContext,
        object_id: &str,
    ) -> SyncResult<ObjectSyncOutcome> {
        self.object_sync
            .complete(ctx.room_id, object_id, &ctx.client_id)
    }

    /// Release everything the client was loading.
    ///
    /// Clients that never joined a room are ignored.
    pub fn on_client_disconnect(&self, client: &Client) {
        let Some(room_id) = client.room_id else {
            debug!(client_id = %client.public_id, "disconnect of client without room");
            return;
        };

        let room_token = self.sync.leave(room_id, &client.public_id);
        let object_tokens = self.object_sync.leave(room_id, &client.public_id);
        debug!(
            room_id,
            client_id = %client.public_id,
            room_sync = room_token.is_some(),
            object_syncs = object_tokens.len(),
            "client disconnected"
        );
    }

    /// Forget all state of a closed room
    pub fn close_room(&self, room_id: RoomId) {
        self.store.drop_room(room_id);
        self.sync.drop_room(room_id);
        self.object_sync.drop_room(room_id);
        self.broadcaster.release_room(room_id);
        info!(room_id, "room closed");
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &WhiteboardStore {
        &self.store
    }

    pub fn sync_barrier(&self) -> &SyncBarrier {
        &self.sync
    }

    pub fn object_barrier(&self) -> &ObjectSyncBarrier {
        &self.object_sync
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}
