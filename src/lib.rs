//! BuddyBeam - Native Desktop Chat Client
//!
//! BuddyBeam renders an authentication gate, a live message feed, and a
//! message composer. Persistence, realtime fan-out, identity, and blob
//! storage are delegated to an external platform reached through three
//! narrow capability traits, so the client logic runs unchanged against the
//! real backend or an in-memory stand-in.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Message and session data model
//!   - Error types, configuration
//!
//! - **`platform`** - The capability boundary
//!   - `IdentityGateway`, `MessageStore`, `BlobStore` traits
//!   - In-memory implementation (tests, offline demo)
//!   - Remote HTTP implementation
//!
//! - **`app`** - The egui client
//!   - Shell, feed, and composer state machines
//!   - Theme and view render functions

pub mod app;
pub mod platform;
pub mod shared;
