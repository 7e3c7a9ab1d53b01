//! Theme Styling Functions
//!
//! Helper functions for applying the dark space theme consistently across
//! the UI components.

use eframe::egui::{self, Stroke};

use super::colors;
use crate::app::notifications::NoticeLevel;

/// Apply the global theme to the egui context
pub fn apply_global_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.window_fill = colors::BG_DARK;
    style.visuals.window_stroke = Stroke::new(1.0, colors::BORDER);
    style.visuals.panel_fill = colors::BG_DARK;

    style.visuals.widgets.noninteractive.bg_fill = colors::INPUT_BG;
    style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    style.visuals.widgets.inactive.bg_fill = colors::INPUT_BG;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    style.visuals.widgets.hovered.bg_fill = colors::BUBBLE_INCOMING;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    style.visuals.widgets.active.bg_fill = colors::ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, colors::BG_DARK);

    style.visuals.selection.bg_fill = colors::ACCENT;
    style.visuals.selection.stroke = Stroke::new(1.0, colors::BG_DARK);

    style.visuals.hyperlink_color = colors::ACCENT;

    ctx.set_style(style);
}

/// Frame for the top bar
pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::TOP_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Frame for the composer area at the bottom of the chat
pub fn composer_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::COMPOSER_BG)
        .stroke(Stroke::new(1.0, colors::BORDER))
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Frame for a transient notice banner
pub fn notice_frame(level: NoticeLevel) -> egui::Frame {
    let fill = match level {
        NoticeLevel::Info => colors::NOTICE_INFO_BG,
        NoticeLevel::Success => colors::NOTICE_SUCCESS_BG,
        NoticeLevel::Error => colors::NOTICE_ERROR_BG,
    };
    egui::Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1.0, notice_text_color(level)))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(10, 6))
}

/// Text color for a transient notice banner
pub fn notice_text_color(level: NoticeLevel) -> egui::Color32 {
    match level {
        NoticeLevel::Info => colors::ACCENT,
        NoticeLevel::Success => colors::SUCCESS,
        NoticeLevel::Error => colors::ERROR,
    }
}
