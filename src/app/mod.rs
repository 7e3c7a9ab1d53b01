//! Client Application Module
//!
//! The egui-facing half of the crate: per-frame state machines for the
//! shell, feed, and composer, plus configuration, transient notifications,
//! the theme, and the view render functions.
//!
//! Everything stateful lives in plain structs polled once per frame;
//! background work reports back over channels. The state machines have no
//! egui dependency and are exercised directly by the test suite.

pub mod composer;
pub mod config;
pub mod feed;
pub mod notifications;
pub mod state;
pub mod theme;
pub mod views;

// Re-export commonly used types
pub use composer::ComposerState;
pub use config::Config;
pub use feed::{FeedPhase, FeedState};
pub use notifications::{NoticeLevel, Notifications};
pub use state::{AppState, SessionPhase};
