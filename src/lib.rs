//! Whiteboard Sync
//!
//! Server-side coordination for a collaborative whiteboard: the per-room
//! whiteboard catalogue, load barriers that tell a room when every client has
//! finished reloading, and moderator-controlled client capabilities.
//!
//! # Modules
//!
//! - `types`: Core data structures (Whiteboard, Client, SyncToken)
//! - `store`: Per-room whiteboard catalogue
//! - `barrier`: Full-reload and embedded-object load barriers
//! - `gate`: Moderator-only capability changes
//! - `broadcast`: Room events and their delivery
//! - `directory`: Session, user and label collaborators
//! - `room`: Per-room locking
//! - `service`: Per-client entry points
//! - `config`: Environment configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use whiteboard_sync::{CallerContext, MemoryDirectory, StaticLabels, SyncConfig, WhiteboardService};
//!
//! let directory = Arc::new(MemoryDirectory::new());
//! let (service, channels) = WhiteboardService::with_channels(
//!     SyncConfig::from_env().unwrap_or_default(),
//!     directory.clone(),
//!     directory,
//!     Arc::new(StaticLabels::new()),
//! );
//!
//! let mut events = channels.subscribe(1);
//! let ctx = CallerContext::new("client-a", 1);
//! service.allocate_board(&ctx, "Sketch");
//! assert!(events.try_recv().is_ok());
//! ```

pub mod barrier;
pub mod broadcast;
pub mod config;
pub mod directory;
pub mod error;
pub mod gate;
pub mod room;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use barrier::{outcome_code, CompleteOutcome, ObjectSyncBarrier, ObjectSyncOutcome, SyncBarrier};
pub use broadcast::{Broadcaster, ChannelBroadcaster, RecordingBroadcaster, RoomEvent, RoomMessage};
pub use config::{ConfigError, RestartPolicy, SyncConfig};
pub use directory::{LabelLookup, MemoryDirectory, SessionDirectory, StaticLabels, UserStore};
pub use error::{DirectoryError, ErrorKind, SyncError, SyncResult};
pub use gate::CapabilityGate;
pub use service::WhiteboardService;
pub use store::WhiteboardStore;
pub use types::{
    CallerContext, Capability, Client, ClientCapabilities, ClientId, ObjectId, Right, RightSet,
    RoomId, SessionData, SyncToken, User, Whiteboard, WhiteboardId,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
