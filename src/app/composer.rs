//! Message Composer
//!
//! Assembles and submits one message from the current input state: free-form
//! text plus at most one staged attachment. Submission is a sequential
//! pipeline on a worker thread (upload the attachment if present, then
//! insert the record) and is never retried automatically. Failures keep the
//! input intact so the user can retry without retyping.

use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

use uuid::Uuid;

use crate::platform::{BlobStore, MessageStore, Platform};
use crate::shared::error::SubmitError;
use crate::shared::message::NewMessage;
use crate::shared::session::Session;

/// Attachment size ceiling: 5 MiB.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// An attachment validated and held locally until submission.
#[derive(Debug, Clone)]
pub struct StagedAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ComposerState {
    /// Message text as typed.
    pub text: String,
    /// Whether the attach-file prompt row is open.
    pub show_attach_prompt: bool,
    /// Path typed into the attach-file prompt.
    pub attach_path_input: String,
    attachment: Option<StagedAttachment>,
    error: Option<String>,
    sending: bool,
    pending: Option<Receiver<Result<(), SubmitError>>>,
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposerState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            show_attach_prompt: false,
            attach_path_input: String::new(),
            attachment: None,
            error: None,
            sending: false,
            pending: None,
        }
    }

    pub fn attachment(&self) -> Option<&StagedAttachment> {
        self.attachment.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// A submission is allowed once there is any content and nothing is in
    /// flight. An entirely empty record is never submitted.
    pub fn can_submit(&self) -> bool {
        !self.sending && (!self.text.trim().is_empty() || self.attachment.is_some())
    }

    /// Validate and stage an attachment. Oversized blobs are rejected
    /// locally; the text and any previously staged attachment are kept.
    pub fn stage_attachment(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        let file_name = file_name.into();
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            tracing::warn!(
                "rejecting oversized attachment {} ({} bytes)",
                file_name,
                bytes.len()
            );
            self.error = Some(format!(
                "Attachment must be smaller than {} MiB",
                MAX_ATTACHMENT_BYTES / (1024 * 1024)
            ));
            return;
        }
        self.attachment = Some(StagedAttachment { file_name, bytes });
        self.error = None;
    }

    /// Read a file from disk and stage it.
    pub fn stage_from_path(&mut self, path: &str) {
        match std::fs::read(path) {
            Ok(bytes) => {
                let file_name = std::path::Path::new(path)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("attachment")
                    .to_string();
                self.stage_attachment(file_name, bytes);
            }
            Err(e) => self.error = Some(format!("Could not read {}: {}", path, e)),
        }
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    /// Start the upload-then-insert pipeline on a worker thread. A no-op
    /// when there is nothing to send or a submission is already in flight.
    pub fn submit(&mut self, platform: &Platform, session: &Session) {
        if !self.can_submit() {
            return;
        }
        self.sending = true;

        let blobs = Arc::clone(&platform.blobs);
        let store = Arc::clone(&platform.store);
        let session = session.clone();
        let text = self.text.clone();
        let attachment = self.attachment.clone();

        let (tx, rx) = channel();
        std::thread::spawn(move || {
            let _ = tx.send(run_submission(
                blobs.as_ref(),
                store.as_ref(),
                &session,
                text,
                attachment,
            ));
        });
        self.pending = Some(rx);
    }

    /// Apply a finished submission, if any. Success clears the input;
    /// failure reports inline and leaves the input untouched.
    pub fn poll(&mut self) {
        let Some(rx) = &self.pending else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.pending = None;
        self.sending = false;

        match result {
            Ok(()) => {
                tracing::info!("message submitted");
                self.text.clear();
                self.attachment = None;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("submission failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Discard all input and any in-flight result (used on sign-out).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Storage path for an attachment. The random token keeps concurrent
/// uploads of identically named files from colliding.
fn storage_path(file_name: &str) -> String {
    format!("chat_images/{}_{}", Uuid::new_v4(), file_name)
}

fn run_submission(
    blobs: &dyn BlobStore,
    store: &dyn MessageStore,
    session: &Session,
    text: String,
    attachment: Option<StagedAttachment>,
) -> Result<(), SubmitError> {
    // Upload first; if it fails the whole submission is aborted and no
    // text-only record is written.
    let image_url = match attachment {
        Some(attachment) => Some(
            blobs
                .upload(&storage_path(&attachment.file_name), &attachment.bytes)
                .map_err(SubmitError::Upload)?,
        ),
        None => None,
    };

    let message = NewMessage {
        text: if text.trim().is_empty() { None } else { Some(text) },
        image_url,
        sender_id: session.user_id.clone(),
        sender: session.display_name.clone(),
        photo_url: session.photo_url.clone(),
    };
    debug_assert!(!message.is_empty());
    store.insert(message).map_err(SubmitError::Insert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemoryPlatform;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn profile() -> Session {
        Session {
            user_id: "u1".to_string(),
            display_name: "Ada".to_string(),
            photo_url: Some("https://avatars.example/ada.png".to_string()),
            email: "ada@example.com".to_string(),
        }
    }

    fn pump(composer: &mut ComposerState) {
        for _ in 0..200 {
            composer.poll();
            if !composer.is_sending() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("submission did not settle");
    }

    #[test]
    fn test_oversized_attachment_rejected_locally() {
        let mut composer = ComposerState::new();
        composer.text = "draft".to_string();
        composer.stage_attachment("big.png", vec![0u8; MAX_ATTACHMENT_BYTES + 1]);

        assert!(composer.error().unwrap().contains("5 MiB"));
        assert!(composer.attachment().is_none());
        assert_eq!(composer.text, "draft");
    }

    #[test]
    fn test_oversized_attachment_keeps_previous_one() {
        let mut composer = ComposerState::new();
        composer.stage_attachment("ok.png", vec![1, 2, 3]);
        composer.stage_attachment("big.png", vec![0u8; MAX_ATTACHMENT_BYTES + 1]);

        assert_eq!(composer.attachment().unwrap().file_name, "ok.png");
        assert!(composer.error().is_some());
    }

    #[test]
    fn test_staging_replaces_and_clears_error() {
        let mut composer = ComposerState::new();
        composer.stage_attachment("big.png", vec![0u8; MAX_ATTACHMENT_BYTES + 1]);
        composer.stage_attachment("ok.png", vec![9]);

        assert_eq!(composer.attachment().unwrap().file_name, "ok.png");
        assert!(composer.error().is_none());
    }

    #[test]
    fn test_empty_submission_is_a_no_op() {
        let platform = MemoryPlatform::signed_in(profile());
        let bundle = platform.clone().into_platform();
        let mut composer = ComposerState::new();
        composer.text = "   ".to_string();

        composer.submit(&bundle, &profile());

        assert!(!composer.is_sending());
        assert_eq!(platform.insert_calls(), 0);
        assert_eq!(platform.upload_calls(), 0);
    }

    #[test]
    fn test_text_submission_inserts_and_clears() {
        let platform = MemoryPlatform::signed_in(profile());
        let bundle = platform.clone().into_platform();
        let mut composer = ComposerState::new();
        composer.text = "hello".to_string();

        composer.submit(&bundle, &profile());
        assert!(!composer.can_submit()); // in flight
        pump(&mut composer);

        let stored = platform.stored_messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text.as_deref(), Some("hello"));
        assert!(stored[0].image_url.is_none());
        assert_eq!(stored[0].sender_id, "u1");
        assert_eq!(stored[0].sender, "Ada");
        assert!(composer.text.is_empty());
        assert!(composer.error().is_none());
    }

    #[test]
    fn test_attachment_submission_uploads_then_inserts() {
        let platform = MemoryPlatform::signed_in(profile());
        let bundle = platform.clone().into_platform();
        let mut composer = ComposerState::new();
        composer.stage_attachment("pic.png", vec![7, 7, 7]);

        composer.submit(&bundle, &profile());
        pump(&mut composer);

        assert_eq!(platform.upload_calls(), 1);
        let stored = platform.stored_messages();
        assert_eq!(stored.len(), 1);
        let url = stored[0].image_url.as_deref().unwrap();
        assert!(url.starts_with("memory://chat_images/"));
        assert!(url.ends_with("_pic.png"));
        assert!(stored[0].text.is_none());
        assert!(composer.attachment().is_none());
    }

    #[test]
    fn test_upload_failure_aborts_whole_submission() {
        let platform = MemoryPlatform::signed_in(profile());
        platform.set_fail_uploads(true);
        let bundle = platform.clone().into_platform();
        let mut composer = ComposerState::new();
        composer.text = "caption".to_string();
        composer.stage_attachment("pic.png", vec![1]);

        composer.submit(&bundle, &profile());
        pump(&mut composer);

        // No text-only fallback was written.
        assert_eq!(platform.insert_calls(), 0);
        assert!(composer.error().unwrap().contains("upload"));
        assert_eq!(composer.text, "caption");
        assert_eq!(composer.attachment().unwrap().file_name, "pic.png");
    }

    #[test]
    fn test_insert_failure_preserves_input() {
        let platform = MemoryPlatform::signed_in(profile());
        platform.set_fail_inserts(true);
        let bundle = platform.clone().into_platform();
        let mut composer = ComposerState::new();
        composer.text = "keep me".to_string();

        composer.submit(&bundle, &profile());
        pump(&mut composer);

        assert!(composer.error().is_some());
        assert_eq!(composer.text, "keep me");
    }

    #[test]
    fn test_storage_path_is_unique_per_call() {
        let a = storage_path("same.png");
        let b = storage_path("same.png");
        assert_ne!(a, b);
        assert!(a.starts_with("chat_images/"));
        assert!(a.ends_with("_same.png"));
    }
}
