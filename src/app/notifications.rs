//! Transient Notifications
//!
//! Short-lived, level-tagged notices shown outside the main layout: session
//! problems, sign-in/out results. Notices expire on their own after a few
//! seconds and can be dismissed early; none of them block the UI.

use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    posted: Instant,
}

#[derive(Debug)]
pub struct Notifications {
    notices: Vec<Notice>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifications {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            notices: Vec::new(),
            ttl,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text.into());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text.into());
    }

    fn push(&mut self, level: NoticeLevel, text: String) {
        tracing::debug!("notice [{:?}]: {}", level, text);
        self.notices.push(Notice {
            level,
            text,
            posted: Instant::now(),
        });
    }

    /// Drop notices older than the TTL.
    pub fn sweep(&mut self) {
        self.sweep_at(Instant::now());
    }

    fn sweep_at(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.notices
            .retain(|n| now.saturating_duration_since(n.posted) < ttl);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
