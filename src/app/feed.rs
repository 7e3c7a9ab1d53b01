//! Live Message Feed
//!
//! Maintains the visible window over the message collection: at most
//! [`FEED_WINDOW`] most-recent messages, kept live by the store's
//! subscription. Snapshots arrive newest-first and replace the view
//! wholesale: there is no incremental merging, so the view can never hold
//! a partially applied update.

use std::sync::mpsc::{channel, Receiver};

use crate::platform::{MessageQuery, MessageStore, Snapshot, Subscription};
use crate::shared::message::Message;

/// Number of most-recent messages kept in view.
pub const FEED_WINDOW: usize = 100;

/// Where the feed is in its lifecycle. `Loading` lasts until the first
/// snapshot; an empty store is `Live` with zero messages, which the view
/// renders as "no messages yet" rather than a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Loading,
    Live,
}

pub struct FeedState {
    phase: FeedPhase,
    /// Oldest first, ready for top-to-bottom rendering.
    messages: Vec<Message>,
    snapshots: Option<Receiver<Snapshot>>,
    subscription: Option<Subscription>,
    scroll_to_newest: bool,
}

impl FeedState {
    /// Open the live query and start in the loading phase.
    pub fn mount(store: &dyn MessageStore) -> Self {
        let (tx, rx) = channel();
        let subscription = store.subscribe(MessageQuery::latest(FEED_WINDOW), tx);
        tracing::info!("feed mounted, window {}", FEED_WINDOW);
        Self {
            phase: FeedPhase::Loading,
            messages: Vec::new(),
            snapshots: Some(rx),
            subscription: Some(subscription),
            scroll_to_newest: false,
        }
    }

    /// Drain and apply pending snapshots. Called once per frame.
    pub fn poll(&mut self) {
        let Some(rx) = &self.snapshots else { return };
        let mut received = Vec::new();
        while let Ok(snapshot) = rx.try_recv() {
            received.push(snapshot);
        }
        for snapshot in received {
            self.apply_snapshot(snapshot);
        }
    }

    /// Replace the whole view with a snapshot: newest-first in, oldest-first
    /// out, capped to the window.
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let mut messages = snapshot.messages;
        messages.truncate(FEED_WINDOW);
        messages.reverse();
        tracing::debug!("feed snapshot applied, {} messages", messages.len());
        self.messages = messages;
        self.phase = FeedPhase::Live;
        self.scroll_to_newest = true;
    }

    /// Stop the subscription. Snapshots produced afterwards are not applied.
    pub fn release(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        self.snapshots = None;
        tracing::info!("feed released");
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Consume the scroll intent set by the latest snapshot.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_newest)
    }
}

impl Drop for FeedState {
    fn drop(&mut self) {
        self.release();
    }
}
