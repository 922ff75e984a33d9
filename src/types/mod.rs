//! Data types shared by the whiteboard store, the barriers and the capability gate.

mod client;
mod context;
mod token;
mod whiteboard;

pub use client::{Capability, Client, ClientCapabilities, Right, RightSet, SessionData, User};
pub use context::CallerContext;
pub use token::SyncToken;
pub use whiteboard::{Whiteboard, WhiteboardCollection};

/// Identifier of a meeting room
pub type RoomId = i64;

/// Identifier of a whiteboard inside a room
pub type WhiteboardId = i64;

/// Public identifier of a connected client
pub type ClientId = String;

/// Identifier of an embedded whiteboard object (image, document page)
pub type ObjectId = String;

/// Identifier of a language in the label catalogue
pub type LanguageId = i64;

