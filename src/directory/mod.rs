//! Interfaces to the session layer, the user store and the label catalogue
//!
//! These collaborators live outside this crate. Implementations must answer
//! from memory or a cache: they are called on the request path, and
//! [`SessionDirectory::update_client`] may be called while other clients of
//! the same room are waiting on barrier operations.

mod labels;
mod memory;

pub use labels::StaticLabels;
pub use memory::MemoryDirectory;

use crate::error::DirectoryError;
use crate::types::{Client, LanguageId, RightSet, SessionData, User};

/// Resolves sessions, connected clients and user rights
pub trait SessionDirectory: Send + Sync {
    /// Validate a login session
    fn session(&self, session_id: &str) -> Option<SessionData>;

    /// Find a connected client by its public id
    fn client_by_public_id(&self, public_id: &str) -> Option<Client>;

    /// Persist a modified client record
    fn update_client(&self, client: &Client) -> Result<(), DirectoryError>;

    /// Rights granted to a user
    fn rights_of(&self, user_id: i64) -> RightSet;
}

/// Looks up user records
pub trait UserStore: Send + Sync {
    fn get(&self, user_id: i64) -> Option<User>;
}

/// Localised label catalogue
pub trait LabelLookup: Send + Sync {
    fn label(&self, key: &str, language_id: LanguageId) -> Option<String>;
}
