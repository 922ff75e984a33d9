//! Load barriers
//!
//! A barrier tracks which clients of a room are still loading and announces
//! completion once the last of them reports done or disconnects.
//!
//! - [`SyncBarrier`]: full whiteboard reload, one token per (room, client)
//! - [`ObjectSyncBarrier`]: embedded object loads, one token per
//!   (room, object, client), completion judged across all objects of the room
//!
//! Registry changes happen under the room lock; the completion event is
//! emitted after the lock is released. Because the zero check runs in the
//! same critical section as the removal, exactly one caller observes the
//! transition to zero.

mod object;
mod registry;
mod room;

pub use object::{outcome_code, ObjectSyncBarrier, ObjectSyncOutcome};
pub use registry::{ObjectSyncRegistry, RoomSyncRegistry};
pub use room::{CompleteOutcome, SyncBarrier};
