//! Application Shell State
//!
//! Owns the observed session and gates the UI on it: a loading state while
//! the first resolution is pending, the sign-in surface when signed out, and
//! feed + composer when signed in. Session failures surface as transient
//! notifications; the shell never becomes non-interactive.

use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

use crate::app::composer::ComposerState;
use crate::app::config::Config;
use crate::app::feed::FeedState;
use crate::app::notifications::Notifications;
use crate::platform::{Platform, SessionEvent, Subscription};
use crate::shared::error::PlatformError;
use crate::shared::session::Session;

/// Session-gated UI phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// First resolution still pending.
    Resolving,
    SignedOut,
    SignedIn(Session),
}

/// Central application state shared across egui views.
pub struct AppState {
    pub config: Config,
    pub notifications: Notifications,
    pub composer: ComposerState,
    /// Present exactly while signed in.
    pub feed: Option<FeedState>,
    platform: Platform,
    phase: SessionPhase,
    session_events: Receiver<SessionEvent>,
    _session_watch: Subscription,
    pending_sign_in: Option<Receiver<Result<Session, PlatformError>>>,
    pending_sign_out: Option<Receiver<Result<(), PlatformError>>>,
}

impl AppState {
    pub fn new(config: Config, platform: Platform) -> Self {
        let (tx, rx) = channel();
        let watch = platform.identity.observe(tx);

        Self {
            config,
            notifications: Notifications::new(),
            composer: ComposerState::new(),
            feed: None,
            platform,
            phase: SessionPhase::Resolving,
            session_events: rx,
            _session_watch: watch,
            pending_sign_in: None,
            pending_sign_out: None,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            SessionPhase::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_signing_in(&self) -> bool {
        self.pending_sign_in.is_some()
    }

    pub fn is_signing_out(&self) -> bool {
        self.pending_sign_out.is_some()
    }

    /// Per-frame tick: drain session events, finish pending operations,
    /// advance feed and composer, expire notices.
    pub fn poll(&mut self) {
        let mut events = Vec::new();
        while let Ok(event) = self.session_events.try_recv() {
            events.push(event);
        }
        for event in events {
            self.apply_session_event(event);
        }

        self.check_sign_in_result();
        self.check_sign_out_result();

        if let Some(feed) = &mut self.feed {
            feed.poll();
        }
        self.composer.poll();
        self.notifications.sweep();
    }

    fn apply_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Changed(Some(session)) => self.enter_signed_in(session),
            SessionEvent::Changed(None) => self.enter_signed_out(),
            SessionEvent::ResolutionFailed(reason) => {
                tracing::warn!("session resolution failed: {}", reason);
                self.notifications
                    .error(format!("Could not resolve session: {}", reason));
                // Not fatal: fall through to the sign-in surface.
                if self.phase == SessionPhase::Resolving {
                    self.phase = SessionPhase::SignedOut;
                }
            }
        }
    }

    fn enter_signed_in(&mut self, session: Session) {
        tracing::info!("signed in as {}", session.user_id);
        if self.feed.is_none() {
            self.feed = Some(FeedState::mount(self.platform.store.as_ref()));
        }
        self.phase = SessionPhase::SignedIn(session);
    }

    fn enter_signed_out(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.release();
        }
        self.composer.reset();
        self.phase = SessionPhase::SignedOut;
    }

    /// Begin interactive sign-in on a worker thread.
    pub fn handle_sign_in(&mut self) {
        if self.pending_sign_in.is_some() {
            return;
        }
        let identity = Arc::clone(&self.platform.identity);
        let (tx, rx) = channel();
        std::thread::spawn(move || {
            let _ = tx.send(identity.sign_in());
        });
        self.pending_sign_in = Some(rx);
    }

    pub fn handle_sign_out(&mut self) {
        if self.pending_sign_out.is_some() {
            return;
        }
        let identity = Arc::clone(&self.platform.identity);
        let (tx, rx) = channel();
        std::thread::spawn(move || {
            let _ = tx.send(identity.sign_out());
        });
        self.pending_sign_out = Some(rx);
    }

    /// Submit the composer under the current session.
    pub fn submit_message(&mut self) {
        if let SessionPhase::SignedIn(session) = &self.phase {
            self.composer.submit(&self.platform, session);
        }
    }

    fn check_sign_in_result(&mut self) {
        let Some(rx) = &self.pending_sign_in else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.pending_sign_in = None;

        match result {
            Ok(session) => {
                self.notifications
                    .success(format!("Signed in as {}", session.display_name));
                // The observed session change carries the same transition;
                // applying directly keeps the UI from lagging a frame.
                self.enter_signed_in(session);
            }
            Err(e) => {
                tracing::warn!("sign-in failed: {}", e);
                self.notifications.error(format!("Sign-in failed: {}", e));
            }
        }
    }

    fn check_sign_out_result(&mut self) {
        let Some(rx) = &self.pending_sign_out else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.pending_sign_out = None;

        match result {
            Ok(()) => {
                self.notifications.info("Signed out");
                self.enter_signed_out();
            }
            Err(e) => {
                tracing::warn!("sign-out failed: {}", e);
                self.notifications.error(format!("Sign-out failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::notifications::NoticeLevel;
    use crate::platform::memory::MemoryPlatform;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn profile() -> Session {
        Session {
            user_id: "u1".to_string(),
            display_name: "Ada".to_string(),
            photo_url: None,
            email: "ada@example.com".to_string(),
        }
    }

    fn pump_until(state: &mut AppState, mut done: impl FnMut(&AppState) -> bool) {
        for _ in 0..200 {
            state.poll();
            if done(state) {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("state did not settle");
    }

    #[test]
    fn test_initial_resolution_signs_out() {
        let platform = MemoryPlatform::new(profile()).into_platform();
        let mut state = AppState::new(Config::default(), platform);

        assert_matches!(state.phase(), SessionPhase::Resolving);
        state.poll();
        assert_matches!(state.phase(), SessionPhase::SignedOut);
        assert!(state.feed.is_none());
    }

    #[test]
    fn test_initial_resolution_restores_session() {
        let platform = MemoryPlatform::signed_in(profile()).into_platform();
        let mut state = AppState::new(Config::default(), platform);

        state.poll();
        assert_matches!(state.phase(), SessionPhase::SignedIn(s) if s.user_id == "u1");
        assert!(state.feed.is_some());
    }

    #[test]
    fn test_resolution_failure_is_not_fatal() {
        let memory = MemoryPlatform::new(profile());
        memory.set_fail_resolution(true);
        let mut state = AppState::new(Config::default(), memory.into_platform());

        state.poll();
        assert_matches!(state.phase(), SessionPhase::SignedOut);
        assert_eq!(state.notifications.notices().len(), 1);
        assert_eq!(state.notifications.notices()[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_sign_in_mounts_feed() {
        let platform = MemoryPlatform::new(profile()).into_platform();
        let mut state = AppState::new(Config::default(), platform);
        state.poll();

        state.handle_sign_in();
        assert!(state.is_signing_in());
        pump_until(&mut state, |s| {
            matches!(s.phase(), SessionPhase::SignedIn(_))
        });

        assert!(state.feed.is_some());
        assert!(!state.is_signing_in());
    }

    #[test]
    fn test_sign_in_failure_reports_and_stays_signed_out() {
        let memory = MemoryPlatform::new(profile());
        memory.set_fail_sign_in(true);
        let mut state = AppState::new(Config::default(), memory.into_platform());
        state.poll();

        state.handle_sign_in();
        pump_until(&mut state, |s| !s.is_signing_in());

        assert_matches!(state.phase(), SessionPhase::SignedOut);
        assert!(state
            .notifications
            .notices()
            .iter()
            .any(|n| n.level == NoticeLevel::Error && n.text.contains("Sign-in failed")));
    }

    #[test]
    fn test_sign_out_releases_feed_and_resets_composer() {
        let platform = MemoryPlatform::signed_in(profile()).into_platform();
        let mut state = AppState::new(Config::default(), platform);
        state.poll();
        assert!(state.feed.is_some());
        state.composer.text = "half-typed".to_string();

        state.handle_sign_out();
        pump_until(&mut state, |s| {
            matches!(s.phase(), SessionPhase::SignedOut)
        });

        assert!(state.feed.is_none());
        assert!(state.composer.text.is_empty());
    }

    #[test]
    fn test_submit_message_requires_session() {
        let memory = MemoryPlatform::new(profile());
        let mut state = AppState::new(Config::default(), memory.clone().into_platform());
        state.poll(); // signed out
        state.composer.text = "hello".to_string();

        state.submit_message();
        state.poll();

        assert_eq!(memory.insert_calls(), 0);
    }
}
