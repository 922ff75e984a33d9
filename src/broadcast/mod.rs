//! Room event fan-out
//!
//! Components never talk to the network. They hand [`RoomEvent`]s to a
//! [`Broadcaster`], which delivers them to every client listening on a room.
//!
//! - [`ChannelBroadcaster`]: one tokio broadcast channel per room
//! - [`RecordingBroadcaster`]: keeps emitted events in memory, for tests

pub mod broadcaster;
pub mod events;
pub mod recording;

pub use broadcaster::{Broadcaster, ChannelBroadcaster};
pub use events::{RoomEvent, RoomMessage};
pub use recording::RecordingBroadcaster;
