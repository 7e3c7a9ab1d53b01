//! Color Constants for the BuddyBeam Theme
//!
//! A dark space-themed scheme: near-black panels, cosmic-blue accent,
//! nebula-pink highlight.

use eframe::egui::Color32;

/// Main background - deep space
pub const BG_DARK: Color32 = Color32::from_rgb(0x0B, 0x0B, 0x15);

/// Top bar background
pub const TOP_BAR_BG: Color32 = Color32::from_rgb(0x11, 0x11, 0x1E);

/// Composer area background
pub const COMPOSER_BG: Color32 = Color32::from_rgb(0x14, 0x14, 0x1F);

/// Text input background
pub const INPUT_BG: Color32 = Color32::from_rgb(0x1C, 0x1C, 0x2B);

/// Borders and separators
pub const BORDER: Color32 = Color32::from_rgb(0x2A, 0x2A, 0x40);

/// Accent - cosmic blue
pub const ACCENT: Color32 = Color32::from_rgb(0x64, 0xB5, 0xF6);

/// Highlight - nebula pink
pub const ACCENT_ALT: Color32 = Color32::from_rgb(0xFF, 0x79, 0xB0);

/// Own message bubble - accent fill, dark text
pub const BUBBLE_OWN: Color32 = ACCENT;

/// Text inside own bubbles
pub const BUBBLE_OWN_TEXT: Color32 = BG_DARK;

/// Incoming message bubble
pub const BUBBLE_INCOMING: Color32 = Color32::from_rgb(0x1E, 0x1E, 0x30);

/// Text on dark backgrounds
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xEC, 0xEF, 0xF4);

/// Secondary text (muted)
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x9A, 0xA0, 0xB5);

/// Timestamp text
pub const TIMESTAMP: Color32 = Color32::from_rgb(0x80, 0x89, 0xA0);

/// Error color
pub const ERROR: Color32 = Color32::from_rgb(0xE5, 0x73, 0x73);

/// Success color
pub const SUCCESS: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);

/// Error notice background
pub const NOTICE_ERROR_BG: Color32 = Color32::from_rgb(0x3A, 0x1A, 0x20);

/// Success notice background
pub const NOTICE_SUCCESS_BG: Color32 = Color32::from_rgb(0x1A, 0x3A, 0x24);

/// Info notice background
pub const NOTICE_INFO_BG: Color32 = Color32::from_rgb(0x1A, 0x2A, 0x3A);
