//! Session Identity Snapshot
//!
//! The authenticated-user state observed from the identity provider. The
//! provider owns the lifecycle; this client only receives snapshots of it.

use serde::{Deserialize, Serialize};

use crate::shared::message::Message;

/// The authenticated user as reported by the identity gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Stable user identifier
    pub user_id: String,
    /// Display name shown next to messages
    pub display_name: String,
    /// Avatar URL, if the provider supplies one
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Account email
    pub email: String,
}

impl Session {
    /// Whether a message was sent under this identity. Evaluated per render
    /// so that a session change re-aligns messages already in view.
    pub fn owns(&self, message: &Message) -> bool {
        message.sender_id == self.user_id
    }
}
