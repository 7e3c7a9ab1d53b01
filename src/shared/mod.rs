//! Shared Module
//!
//! Platform-agnostic types used across the client: the message data model,
//! the session identity snapshot, error types, and configuration. Everything
//! here is serializable and free of UI or network concerns.

/// Message data model
pub mod message;

/// Session identity snapshot
pub mod session;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{PlatformError, SubmitError};
pub use message::{Message, NewMessage};
pub use session::Session;
