//! In-Memory Platform
//!
//! One process-local value implementing all three capabilities. Used by the
//! test suite and by the offline demo mode. Inserts assign ids and
//! timestamps and fan a fresh snapshot out to every live subscriber, which
//! makes the full compose-to-feed loop observable without a backend.
//!
//! Failure injection toggles and call counters exist so tests can assert
//! not just what happened but what was never attempted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::platform::{
    BlobStore, IdentityGateway, MessageQuery, MessageStore, Platform, SessionEvent, Snapshot,
    Subscription,
};
use crate::shared::error::PlatformError;
use crate::shared::message::{Message, NewMessage};
use crate::shared::session::Session;

/// In-process identity + store + blobs.
#[derive(Clone)]
pub struct MemoryPlatform {
    inner: Arc<Inner>,
}

struct Inner {
    /// The identity that `sign_in` activates.
    profile: Session,
    current: Mutex<Option<Session>>,
    session_subs: Mutex<Vec<(u64, Sender<SessionEvent>)>>,
    /// Messages in creation order (the store's assigned ordering).
    messages: Mutex<Vec<Message>>,
    message_subs: Mutex<Vec<MessageSub>>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    next_sub: AtomicU64,
    fail_resolution: AtomicBool,
    fail_sign_in: AtomicBool,
    fail_uploads: AtomicBool,
    fail_inserts: AtomicBool,
    upload_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

struct MessageSub {
    id: u64,
    query: MessageQuery,
    sender: Sender<Snapshot>,
}

impl MemoryPlatform {
    /// Create a platform with no active session; `sign_in` activates
    /// `profile`.
    pub fn new(profile: Session) -> Self {
        Self {
            inner: Arc::new(Inner {
                profile,
                current: Mutex::new(None),
                session_subs: Mutex::new(Vec::new()),
                messages: Mutex::new(Vec::new()),
                message_subs: Mutex::new(Vec::new()),
                blobs: Mutex::new(HashMap::new()),
                next_sub: AtomicU64::new(0),
                fail_resolution: AtomicBool::new(false),
                fail_sign_in: AtomicBool::new(false),
                fail_uploads: AtomicBool::new(false),
                fail_inserts: AtomicBool::new(false),
                upload_calls: AtomicUsize::new(0),
                insert_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Create a platform whose session is already resolved to `profile`.
    pub fn signed_in(profile: Session) -> Self {
        let platform = Self::new(profile.clone());
        *platform.inner.current.lock().unwrap() = Some(profile);
        platform
    }

    /// Bundle this value as all three capabilities.
    pub fn into_platform(self) -> Platform {
        Platform {
            identity: Arc::new(self.clone()),
            store: Arc::new(self.clone()),
            blobs: Arc::new(self),
        }
    }

    pub fn set_fail_resolution(&self, fail: bool) {
        self.inner.fail_resolution.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_sign_in(&self, fail: bool) {
        self.inner.fail_sign_in.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.inner.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.inner.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// How many times `upload` was called, successful or not.
    pub fn upload_calls(&self) -> usize {
        self.inner.upload_calls.load(Ordering::SeqCst)
    }

    /// How many times `insert` was called, successful or not.
    pub fn insert_calls(&self) -> usize {
        self.inner.insert_calls.load(Ordering::SeqCst)
    }

    /// All stored messages in creation order.
    pub fn stored_messages(&self) -> Vec<Message> {
        self.inner.messages.lock().unwrap().clone()
    }

    /// The stored bytes for an uploaded blob path, if any.
    pub fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.blobs.lock().unwrap().get(path).cloned()
    }

    fn broadcast_session(&self, event: &SessionEvent) {
        let mut subs = self.inner.session_subs.lock().unwrap();
        subs.retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }

    fn broadcast_messages(&self) {
        let messages = self.inner.messages.lock().unwrap().clone();
        let mut subs = self.inner.message_subs.lock().unwrap();
        subs.retain(|sub| sub.sender.send(snapshot_for(&messages, sub.query)).is_ok());
    }
}

/// The newest `query.limit` messages, ordered newest first.
fn snapshot_for(messages: &[Message], query: MessageQuery) -> Snapshot {
    let newest: Vec<Message> = messages
        .iter()
        .rev()
        .take(query.limit)
        .cloned()
        .collect();
    Snapshot { messages: newest }
}

impl IdentityGateway for MemoryPlatform {
    fn observe(&self, events: Sender<SessionEvent>) -> Subscription {
        let initial = if self.inner.fail_resolution.load(Ordering::SeqCst) {
            SessionEvent::ResolutionFailed("identity provider unreachable".to_string())
        } else {
            SessionEvent::Changed(self.inner.current.lock().unwrap().clone())
        };
        let _ = events.send(initial);

        let id = self.inner.next_sub.fetch_add(1, Ordering::SeqCst);
        self.inner.session_subs.lock().unwrap().push((id, events));

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || {
            inner.session_subs.lock().unwrap().retain(|(sub_id, _)| *sub_id != id);
        })
    }

    fn sign_in(&self) -> Result<Session, PlatformError> {
        if self.inner.fail_sign_in.load(Ordering::SeqCst) {
            return Err(PlatformError::network("identity provider unreachable"));
        }
        let session = self.inner.profile.clone();
        *self.inner.current.lock().unwrap() = Some(session.clone());
        self.broadcast_session(&SessionEvent::Changed(Some(session.clone())));
        Ok(session)
    }

    fn sign_out(&self) -> Result<(), PlatformError> {
        *self.inner.current.lock().unwrap() = None;
        self.broadcast_session(&SessionEvent::Changed(None));
        Ok(())
    }
}

impl MessageStore for MemoryPlatform {
    fn subscribe(&self, query: MessageQuery, snapshots: Sender<Snapshot>) -> Subscription {
        // Live queries deliver their current result set right away.
        let messages = self.inner.messages.lock().unwrap().clone();
        let _ = snapshots.send(snapshot_for(&messages, query));

        let id = self.inner.next_sub.fetch_add(1, Ordering::SeqCst);
        self.inner.message_subs.lock().unwrap().push(MessageSub {
            id,
            query,
            sender: snapshots,
        });

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || {
            inner.message_subs.lock().unwrap().retain(|sub| sub.id != id);
        })
    }

    fn insert(&self, message: NewMessage) -> Result<(), PlatformError> {
        self.inner.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_inserts.load(Ordering::SeqCst) {
            return Err(PlatformError::backend("insert refused"));
        }

        let stored = Message {
            id: Uuid::new_v4().to_string(),
            text: message.text,
            image_url: message.image_url,
            sender_id: message.sender_id,
            sender: message.sender,
            photo_url: message.photo_url,
            timestamp: Some(Utc::now()),
        };
        self.inner.messages.lock().unwrap().push(stored);
        self.broadcast_messages();
        Ok(())
    }
}

impl BlobStore for MemoryPlatform {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, PlatformError> {
        self.inner.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_uploads.load(Ordering::SeqCst) {
            return Err(PlatformError::network("blob store unreachable"));
        }
        self.inner
            .blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.to_vec());
        Ok(format!("memory://{}", path))
    }
}
