//! End-to-end client scenarios over the in-memory platform.
//!
//! These exercise the full compose-to-feed loop through the capability
//! traits: the shell observes the session, the composer writes through the
//! blob/document capabilities, and the feed receives what the store fans
//! out, with no direct call from composer to feed anywhere.

use std::time::Duration;

use assert_matches::assert_matches;
use buddybeam::app::feed::{FeedPhase, FeedState, FEED_WINDOW};
use buddybeam::app::{AppState, Config, SessionPhase};
use buddybeam::platform::memory::MemoryPlatform;
use buddybeam::platform::MessageStore;
use buddybeam::shared::message::NewMessage;
use buddybeam::shared::session::Session;
use pretty_assertions::assert_eq;

fn ada() -> Session {
    Session {
        user_id: "ada".to_string(),
        display_name: "Ada".to_string(),
        photo_url: Some("https://avatars.example/ada.png".to_string()),
        email: "ada@example.com".to_string(),
    }
}

fn grace() -> Session {
    Session {
        user_id: "grace".to_string(),
        display_name: "Grace".to_string(),
        photo_url: None,
        email: "grace@example.com".to_string(),
    }
}

fn text_message(sender: &Session, text: &str) -> NewMessage {
    NewMessage {
        text: Some(text.to_string()),
        image_url: None,
        sender_id: sender.user_id.clone(),
        sender: sender.display_name.clone(),
        photo_url: sender.photo_url.clone(),
    }
}

/// Poll the shell until `done` holds or a bounded wait expires.
fn pump_until(state: &mut AppState, mut done: impl FnMut(&AppState) -> bool) {
    for _ in 0..400 {
        state.poll();
        if done(state) {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("state did not settle");
}

#[test]
fn sent_message_comes_back_through_the_feed() {
    let memory = MemoryPlatform::signed_in(ada());
    let mut state = AppState::new(Config::default(), memory.clone().into_platform());
    pump_until(&mut state, |s| matches!(s.phase(), SessionPhase::SignedIn(_)));

    state.composer.text = "hello".to_string();
    state.submit_message();
    pump_until(&mut state, |s| {
        s.feed
            .as_ref()
            .map(|f| !f.messages().is_empty())
            .unwrap_or(false)
    });

    let feed = state.feed.as_ref().unwrap();
    assert_eq!(feed.messages().len(), 1);
    let message = &feed.messages()[0];
    assert_eq!(message.text.as_deref(), Some("hello"));
    assert_eq!(message.sender_id, "ada");
    assert!(message.image_url.is_none());
    assert!(message.timestamp.is_some());
    assert!(state.composer.text.is_empty());
}

#[test]
fn feed_orders_ascending_and_caps_at_the_window() {
    let memory = MemoryPlatform::signed_in(ada());
    let sender = ada();
    for i in 0..FEED_WINDOW + 20 {
        memory.insert(text_message(&sender, &format!("m{}", i))).unwrap();
    }

    let mut feed = FeedState::mount(&memory);
    feed.poll();

    assert_eq!(feed.messages().len(), FEED_WINDOW);
    // Oldest surviving message first, newest last; the first 20 fell out of
    // the window.
    assert_eq!(feed.messages()[0].text.as_deref(), Some("m20"));
    assert_eq!(
        feed.messages().last().unwrap().text.as_deref(),
        Some(&*format!("m{}", FEED_WINDOW + 19))
    );
}

#[test]
fn empty_store_shows_empty_state_not_loading() {
    let memory = MemoryPlatform::signed_in(ada());
    let mut feed = FeedState::mount(&memory);
    assert_eq!(feed.phase(), FeedPhase::Loading);

    feed.poll();

    assert_eq!(feed.phase(), FeedPhase::Live);
    assert!(feed.messages().is_empty());
}

#[test]
fn released_feed_never_sees_later_snapshots() {
    let memory = MemoryPlatform::signed_in(ada());
    let mut feed = FeedState::mount(&memory);
    feed.poll();
    feed.release();

    memory.insert(text_message(&ada(), "late")).unwrap();
    feed.poll();

    assert!(feed.messages().is_empty());
}

#[test]
fn oversized_attachment_makes_zero_network_calls() {
    let memory = MemoryPlatform::signed_in(ada());
    let mut state = AppState::new(Config::default(), memory.clone().into_platform());
    pump_until(&mut state, |s| matches!(s.phase(), SessionPhase::SignedIn(_)));

    state
        .composer
        .stage_attachment("huge.png", vec![0u8; 6 * 1024 * 1024]);
    assert!(state.composer.error().is_some());
    assert!(state.composer.attachment().is_none());

    // Nothing stageable and no text: submit must not reach the network.
    state.submit_message();
    state.poll();
    assert_eq!(memory.upload_calls(), 0);
    assert_eq!(memory.insert_calls(), 0);
}

#[test]
fn upload_failure_aborts_without_text_fallback() {
    let memory = MemoryPlatform::signed_in(ada());
    memory.set_fail_uploads(true);
    let mut state = AppState::new(Config::default(), memory.clone().into_platform());
    pump_until(&mut state, |s| matches!(s.phase(), SessionPhase::SignedIn(_)));

    state.composer.text = "caption".to_string();
    state.composer.stage_attachment("pic.png", vec![1, 2, 3]);
    state.submit_message();
    pump_until(&mut state, |s| !s.composer.is_sending());

    assert_eq!(memory.upload_calls(), 1);
    assert_eq!(memory.insert_calls(), 0);
    assert_eq!(state.composer.text, "caption");
    assert_eq!(state.composer.attachment().unwrap().file_name, "pic.png");
}

#[test]
fn attachment_submission_lands_with_url_and_caption() {
    let memory = MemoryPlatform::signed_in(ada());
    let mut state = AppState::new(Config::default(), memory.clone().into_platform());
    pump_until(&mut state, |s| matches!(s.phase(), SessionPhase::SignedIn(_)));

    state.composer.text = "look at this".to_string();
    state.composer.stage_attachment("nebula.png", vec![42; 128]);
    state.submit_message();
    pump_until(&mut state, |s| {
        s.feed
            .as_ref()
            .map(|f| !f.messages().is_empty())
            .unwrap_or(false)
    });

    let feed = state.feed.as_ref().unwrap();
    let message = &feed.messages()[0];
    assert_eq!(message.text.as_deref(), Some("look at this"));
    let url = message.image_url.as_deref().unwrap();
    assert!(url.starts_with("memory://chat_images/"));
    assert!(url.ends_with("_nebula.png"));
    // The uploaded bytes are retrievable under the same path.
    let path = url.strip_prefix("memory://").unwrap();
    assert_eq!(memory.blob(path).unwrap(), vec![42; 128]);
}

#[test]
fn alignment_follows_the_live_session() {
    let memory = MemoryPlatform::signed_in(ada());
    memory.insert(text_message(&ada(), "from ada")).unwrap();

    let mut feed = FeedState::mount(&memory);
    feed.poll();
    let message = feed.messages()[0].clone();

    // The same historical message renders right-aligned for Ada and
    // left-aligned after Grace signs in; nothing about the message changed.
    assert!(ada().owns(&message));
    assert!(!grace().owns(&message));
}

#[test]
fn sign_out_tears_down_feed_and_composer() {
    let memory = MemoryPlatform::signed_in(ada());
    let mut state = AppState::new(Config::default(), memory.clone().into_platform());
    pump_until(&mut state, |s| matches!(s.phase(), SessionPhase::SignedIn(_)));
    assert!(state.feed.is_some());
    state.composer.text = "draft".to_string();

    state.handle_sign_out();
    pump_until(&mut state, |s| matches!(s.phase(), SessionPhase::SignedOut));

    assert!(state.feed.is_none());
    assert!(state.composer.text.is_empty());

    // A write landing after teardown updates nothing and raises nothing.
    memory.insert(text_message(&ada(), "postscript")).unwrap();
    state.poll();
    assert!(state.feed.is_none());
}

#[test]
fn resolution_failure_still_offers_sign_in() {
    let memory = MemoryPlatform::new(ada());
    memory.set_fail_resolution(true);
    let mut state = AppState::new(Config::default(), memory.clone().into_platform());

    state.poll();
    assert_matches!(state.phase(), SessionPhase::SignedOut);
    assert!(!state.notifications.is_empty());

    // The provider recovers; interactive sign-in works.
    memory.set_fail_resolution(false);
    state.handle_sign_in();
    pump_until(&mut state, |s| matches!(s.phase(), SessionPhase::SignedIn(_)));
    assert!(state.feed.is_some());
}
