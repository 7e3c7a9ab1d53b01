//! Feed View
//!
//! Renders the live message window: a loading spinner until the first
//! snapshot, an explicit empty state for a store with no messages, and the
//! chat log otherwise. Ownership alignment is computed against the live
//! session on every render, so a re-login re-aligns history already in view.

use chrono::{DateTime, Local, Utc};
use eframe::egui;

use crate::app::feed::{FeedPhase, FeedState};
use crate::app::theme::colors;
use crate::shared::message::Message;
use crate::shared::session::Session;

pub fn render(ui: &mut egui::Ui, feed: &mut FeedState, session: &Session) {
    match feed.phase() {
        FeedPhase::Loading => render_loading(ui),
        FeedPhase::Live if feed.messages().is_empty() => render_empty_state(ui),
        FeedPhase::Live => render_messages(ui, feed, session),
    }
}

fn render_loading(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.spinner();
    });
}

fn render_empty_state(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.colored_label(colors::TEXT_SECONDARY, "No messages yet. Send the first one!");
    });
}

fn render_messages(ui: &mut egui::Ui, feed: &mut FeedState, session: &Session) {
    let scroll_to_newest = feed.take_scroll_request();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);

            for message in feed.messages() {
                render_bubble(ui, message, session.owns(message));
            }

            if scroll_to_newest {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }

            ui.add_space(8.0);
        });
}

fn render_bubble(ui: &mut egui::Ui, message: &Message, is_own: bool) {
    let (bubble_fill, text_color, align) = if is_own {
        (colors::BUBBLE_OWN, colors::BUBBLE_OWN_TEXT, egui::Align::RIGHT)
    } else {
        (colors::BUBBLE_INCOMING, colors::TEXT_LIGHT, egui::Align::LEFT)
    };

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        let max_width = ui.available_width() * 0.7;

        ui.allocate_ui_with_layout(
            egui::vec2(max_width, 0.0),
            egui::Layout::top_down(align),
            |ui| {
                egui::Frame::new()
                    .fill(bubble_fill)
                    .corner_radius(egui::CornerRadius {
                        nw: if is_own { 12 } else { 4 },
                        ne: if is_own { 4 } else { 12 },
                        sw: 12,
                        se: 12,
                    })
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        if let Some(url) = &message.image_url {
                            ui.hyperlink_to("🖼 attachment", url);
                        }
                        if let Some(text) = &message.text {
                            ui.label(egui::RichText::new(text).color(text_color));
                        }

                        let time = format_time(message.timestamp);
                        if !time.is_empty() {
                            ui.colored_label(
                                colors::TIMESTAMP,
                                egui::RichText::new(time).size(10.5),
                            );
                        }
                    });

                if !is_own {
                    ui.colored_label(
                        colors::TEXT_SECONDARY,
                        egui::RichText::new(&message.sender).size(11.0),
                    );
                }
            },
        );
    });

    ui.add_space(4.0);
}

/// HH:MM in local time; blank until the server-assigned timestamp resolves.
fn format_time(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}
