//! Theme Module
//!
//! Color scheme and styling for the chat UI: a dark space-themed palette
//! with a cosmic-blue accent, plus frame and style helpers so views stay
//! consistent.

pub mod colors;
pub mod styles;
