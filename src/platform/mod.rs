//! Capability Interfaces to the External Platform
//!
//! The client delegates identity, message persistence with live-query
//! fan-out, and blob storage to an external platform. Each concern is a
//! narrow trait so the Shell/Feed/Composer logic can run against the real
//! backend or an in-memory stand-in interchangeably.
//!
//! Subscriptions follow the push-over-channel model used throughout the
//! client: the caller hands in an `mpsc::Sender`, the implementation pushes
//! events from wherever it produces them, and the UI side drains with
//! `try_recv` once per frame. Dropping the receiver or releasing the
//! returned [`Subscription`] ends delivery.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::shared::error::PlatformError;
use crate::shared::message::{Message, NewMessage};
use crate::shared::session::Session;

pub mod memory;
pub mod remote;

/// A standing live query over the message collection: the newest `limit`
/// messages, ordered by creation time descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageQuery {
    pub limit: usize,
}

impl MessageQuery {
    pub fn latest(limit: usize) -> Self {
        Self { limit }
    }
}

/// A complete result set pushed by the store's live query. Not a diff:
/// every snapshot replaces the previous one entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Messages ordered newest first, at most the query limit
    pub messages: Vec<Message>,
}

/// Session-state updates pushed by the identity gateway.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The current session, or `None` when signed out. The first event after
    /// subscribing carries the initial resolution.
    Changed(Option<Session>),
    /// The initial resolution itself failed (provider unreachable). The
    /// gateway stays subscribed and may still deliver `Changed` later.
    ResolutionFailed(String),
}

/// Guard for a live subscription. Delivery stops when it is released,
/// explicitly or on drop; releasing twice is a no-op.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop delivery. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("released", &self.cancel.is_none())
            .finish()
    }
}

/// Identity capability: observe the session, begin sign-in, sign out.
pub trait IdentityGateway: Send + Sync {
    /// Observe session state. Pushes the initial resolution immediately,
    /// then one event per sign-in or sign-out.
    fn observe(&self, events: Sender<SessionEvent>) -> Subscription;

    /// Begin interactive sign-in. Blocks until the provider answers; run it
    /// on a worker thread.
    fn sign_in(&self) -> Result<Session, PlatformError>;

    /// End the current session.
    fn sign_out(&self) -> Result<(), PlatformError>;
}

/// Document-store capability: live query subscription plus inserts.
pub trait MessageStore: Send + Sync {
    /// Open a live query. A full snapshot is pushed immediately and after
    /// every change to the underlying result set.
    fn subscribe(&self, query: MessageQuery, snapshots: Sender<Snapshot>) -> Subscription;

    /// Insert a new document. The store assigns the id and creation time.
    fn insert(&self, message: NewMessage) -> Result<(), PlatformError>;
}

/// Blob-store capability: upload bytes, get back a retrievable URL.
pub trait BlobStore: Send + Sync {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, PlatformError>;
}

/// The three capabilities bundled for handing around the app.
#[derive(Clone)]
pub struct Platform {
    pub identity: Arc<dyn IdentityGateway>,
    pub store: Arc<dyn MessageStore>,
    pub blobs: Arc<dyn BlobStore>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscription_releases_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let mut sub = Subscription::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        sub.release();
        sub.release();
        drop(sub);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_releases_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        {
            let _sub = Subscription::new(move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
