//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use whiteboard_sync::{
    Client, MemoryDirectory, RecordingBroadcaster, Right, StaticLabels, SyncConfig,
    WhiteboardService,
};

/// Route tracing output through the test harness, filtered by RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Harness {
    pub service: Arc<WhiteboardService>,
    pub directory: Arc<MemoryDirectory>,
    pub recorder: Arc<RecordingBroadcaster>,
}

/// Service wired to in-memory collaborators and a recording broadcaster.
///
/// Room 1 has a moderator "mod" (user 1, session "mod-session") and an
/// attendee "attendee" (user 2, session "user-session").
pub fn harness(config: SyncConfig, labels: StaticLabels) -> Harness {
    init_tracing();

    let directory = Arc::new(MemoryDirectory::new());
    let recorder = Arc::new(RecordingBroadcaster::new());

    directory.add_session("mod-session", 1);
    directory.add_session("user-session", 2);
    directory.grant(1, [Right::Room, Right::Admin].into_iter().collect());
    directory.grant(2, [Right::Room].into_iter().collect());
    directory.connect(Client::new("mod", 1).with_user(1).moderator());
    directory.connect(Client::new("attendee", 1).with_user(2));

    let service = Arc::new(WhiteboardService::new(
        config,
        directory.clone(),
        directory.clone(),
        Arc::new(labels),
        recorder.clone(),
    ));

    Harness {
        service,
        directory,
        recorder,
    }
}
