//! Full whiteboard reload barrier

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::registry::RoomSyncRegistry;
use crate::broadcast::{Broadcaster, RoomEvent};
use crate::config::RestartPolicy;
use crate::error::{SyncError, SyncResult};
use crate::room::RoomTable;
use crate::types::{RoomId, SyncToken};

/// Result of a successful `complete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteOutcome {
    /// The last loader finished; `sendSyncCompleteFlag` was emitted with this token
    Released(SyncToken),
    /// Other clients are still loading
    Pending { remaining: usize },
}

/// What happened under the lock during `complete`
enum Completion {
    Missing,
    NotLoading,
    Removed { token: SyncToken, remaining: usize },
}

/// Barrier for clients reloading the whole whiteboard
pub struct SyncBarrier {
    rooms: RoomTable<RoomSyncRegistry>,
    broadcaster: Arc<dyn Broadcaster>,
    policy: RestartPolicy,
}

impl SyncBarrier {
    pub fn new(broadcaster: Arc<dyn Broadcaster>, policy: RestartPolicy) -> Self {
        Self {
            rooms: RoomTable::new(),
            broadcaster,
            policy,
        }
    }

    /// Register the client as loading and announce it to the room
    pub fn start(&self, room_id: RoomId, client_id: &str) -> SyncResult<SyncToken> {
        let token = SyncToken::room_load(room_id, client_id);

        let replaced = self.rooms.with_room(room_id, |registry| {
            if self.policy == RestartPolicy::Reject && registry.contains(client_id) {
                return Err(SyncError::AlreadyStarted {
                    room_id,
                    client_id: client_id.to_string(),
                });
            }
            Ok(registry.insert(token.clone()).is_some())
        });

        match replaced {
            Ok(replaced) => {
                if replaced {
                    debug!(room_id, client_id, "sync restarted, previous token replaced");
                }
                self.broadcaster.send_to_room(
                    room_id,
                    RoomEvent::SendSyncFlag {
                        token: token.clone(),
                    },
                );
                Ok(token)
            }
            Err(err) => {
                warn!(room_id, client_id, "sync already in progress");
                Err(err)
            }
        }
    }

    /// Report that the client finished loading
    pub fn complete(&self, room_id: RoomId, client_id: &str) -> SyncResult<CompleteOutcome> {
        let completion = self
            .rooms
            .with_existing(room_id, |registry| {
                match registry.get(client_id) {
                    None => return Completion::Missing,
                    Some(token) if !token.is_currently_loading => return Completion::NotLoading,
                    Some(_) => {}
                }
                match registry.remove(client_id) {
                    Some(token) => Completion::Removed {
                        token,
                        remaining: registry.initial_loaders(),
                    },
                    None => Completion::Missing,
                }
            })
            .unwrap_or(Completion::Missing);

        match completion {
            Completion::Missing => {
                warn!(room_id, client_id, "no sync token for client");
                Err(SyncError::NotStarted {
                    room_id,
                    client_id: client_id.to_string(),
                })
            }
            Completion::NotLoading => {
                warn!(room_id, client_id, "sync token was not started yet");
                Err(SyncError::NotYetLoading {
                    room_id,
                    client_id: client_id.to_string(),
                })
            }
            Completion::Removed { token, remaining } if remaining == 0 => {
                info!(room_id, client_id, "whiteboard sync complete");
                self.broadcaster.send_to_room(
                    room_id,
                    RoomEvent::SendSyncCompleteFlag {
                        token: token.clone(),
                    },
                );
                Ok(CompleteOutcome::Released(token))
            }
            Completion::Removed { remaining, .. } => {
                debug!(room_id, client_id, remaining, "client finished loading");
                Ok(CompleteOutcome::Pending { remaining })
            }
        }
    }

    /// Drop the client's token on disconnect.
    ///
    /// Safe for clients that never started. Returns the removed token.
    pub fn leave(&self, room_id: RoomId, client_id: &str) -> Option<SyncToken> {
        let removed = self
            .rooms
            .with_existing(room_id, |registry| {
                registry
                    .remove(client_id)
                    .map(|token| (token, registry.initial_loaders()))
            })
            .flatten();

        let (token, remaining) = removed?;
        debug!(room_id, client_id, remaining, "loading client left");

        if remaining == 0 && self.broadcaster.has_listeners(room_id) {
            info!(room_id, client_id, "whiteboard sync complete after disconnect");
            self.broadcaster.send_to_room(
                room_id,
                RoomEvent::SendSyncCompleteFlag {
                    token: token.clone(),
                },
            );
        }
        Some(token)
    }

    /// Tokens still outstanding in the room
    pub fn pending(&self, room_id: RoomId) -> Vec<SyncToken> {
        self.rooms
            .with_existing(room_id, |registry| registry.tokens())
            .unwrap_or_default()
    }

    pub fn drop_room(&self, room_id: RoomId) -> bool {
        self.rooms.remove(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::RecordingBroadcaster;
    use crate::error::ErrorKind;

    fn barrier(policy: RestartPolicy) -> (SyncBarrier, Arc<RecordingBroadcaster>) {
        let recorder = Arc::new(RecordingBroadcaster::new());
        (SyncBarrier::new(recorder.clone(), policy), recorder)
    }

    #[test]
    fn test_three_clients_release_once() {
        let (barrier, recorder) = barrier(RestartPolicy::Overwrite);
        for client in ["A", "B", "C"] {
            barrier.start(1, client).unwrap();
        }
        assert_eq!(recorder.count_named(1, "sendSyncFlag"), 3);

        assert_eq!(
            barrier.complete(1, "A").unwrap(),
            CompleteOutcome::Pending { remaining: 2 }
        );
        assert_eq!(
            barrier.complete(1, "B").unwrap(),
            CompleteOutcome::Pending { remaining: 1 }
        );
        assert_eq!(recorder.count_named(1, "sendSyncCompleteFlag"), 0);

        let outcome = barrier.complete(1, "C").unwrap();
        let CompleteOutcome::Released(token) = outcome else {
            panic!("expected release, got {:?}", outcome);
        };
        assert_eq!(token.client_id, "C");

        let completions = recorder.events_named(1, "sendSyncCompleteFlag");
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0], RoomEvent::SendSyncCompleteFlag { token });
    }

    #[test]
    fn test_complete_without_start() {
        let (barrier, recorder) = barrier(RestartPolicy::Overwrite);
        let err = barrier.complete(1, "ghost").unwrap_err();

        assert_eq!(
            err,
            SyncError::NotStarted {
                room_id: 1,
                client_id: "ghost".to_string()
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_complete_twice_fails_second_time() {
        let (barrier, recorder) = barrier(RestartPolicy::Overwrite);
        barrier.start(1, "A").unwrap();
        barrier.complete(1, "A").unwrap();

        assert!(barrier.complete(1, "A").is_err());
        assert_eq!(recorder.count_named(1, "sendSyncCompleteFlag"), 1);
    }

    #[test]
    fn test_not_loading_token_is_left_alone() {
        let (barrier, recorder) = barrier(RestartPolicy::Overwrite);
        barrier.rooms.with_room(1, |registry| {
            let mut token = SyncToken::room_load(1, "A");
            token.is_currently_loading = false;
            registry.insert(token);
        });

        let err = barrier.complete(1, "A").unwrap_err();
        assert!(matches!(err, SyncError::NotYetLoading { .. }));
        assert_eq!(barrier.pending(1).len(), 1);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_restart_overwrites_by_default() {
        let (barrier, _) = barrier(RestartPolicy::Overwrite);
        barrier.start(1, "A").unwrap();
        barrier.start(1, "A").unwrap();

        assert_eq!(barrier.pending(1).len(), 1);
        assert!(matches!(
            barrier.complete(1, "A").unwrap(),
            CompleteOutcome::Released(_)
        ));
    }

    #[test]
    fn test_restart_rejected_by_policy() {
        let (barrier, recorder) = barrier(RestartPolicy::Reject);
        let first = barrier.start(1, "A").unwrap();

        let err = barrier.start(1, "A").unwrap_err();
        assert!(matches!(err, SyncError::AlreadyStarted { .. }));
        assert_eq!(barrier.pending(1), vec![first]);
        assert_eq!(recorder.count_named(1, "sendSyncFlag"), 1);
    }

    #[test]
    fn test_leave_unregistered_is_noop() {
        let (barrier, recorder) = barrier(RestartPolicy::Overwrite);
        assert!(barrier.leave(1, "ghost").is_none());

        barrier.start(1, "A").unwrap();
        recorder.clear();
        assert!(barrier.leave(1, "ghost").is_none());
        assert!(recorder.is_empty());
        assert_eq!(barrier.pending(1).len(), 1);
    }

    #[test]
    fn test_leave_of_last_loader_releases() {
        let (barrier, recorder) = barrier(RestartPolicy::Overwrite);
        barrier.start(1, "A").unwrap();
        barrier.start(1, "B").unwrap();

        barrier.complete(1, "A").unwrap();
        let token = barrier.leave(1, "B").unwrap();

        assert_eq!(
            recorder.events_named(1, "sendSyncCompleteFlag"),
            vec![RoomEvent::SendSyncCompleteFlag { token }]
        );
    }

    #[test]
    fn test_leave_skips_event_for_room_without_listeners() {
        let (barrier, recorder) = barrier(RestartPolicy::Overwrite);
        barrier.start(1, "A").unwrap();
        recorder.silence_room(1);

        assert!(barrier.leave(1, "A").is_some());
        assert_eq!(recorder.count_named(1, "sendSyncCompleteFlag"), 0);
        assert!(barrier.pending(1).is_empty());
    }
}
