//! Message Data Structure
//!
//! A message is the only durable entity in the system. Records are created
//! once by the composer, assigned their id and creation time by the store,
//! and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored chat message as pushed by the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned identifier, unique and immutable
    pub id: String,
    /// Optional text body
    #[serde(default)]
    pub text: Option<String>,
    /// Optional attachment URL, present only after a completed upload
    #[serde(default)]
    pub image_url: Option<String>,
    /// Identifier of the authenticated sender
    pub sender_id: String,
    /// Sender display name, captured at send time
    pub sender: String,
    /// Sender avatar URL, captured at send time
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Server-assigned creation time; absent until the store has accepted
    /// the write
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Payload for inserting a new message. The store assigns `id` and
/// `timestamp` on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub sender_id: String,
    pub sender: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl NewMessage {
    /// Whether this payload carries no content at all. A record must have at
    /// least one of non-blank text or an attachment URL; the composer
    /// refuses to submit anything for which this returns true.
    pub fn is_empty(&self) -> bool {
        let has_text = self
            .text
            .as_ref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        !has_text && self.image_url.is_none()
    }
}
