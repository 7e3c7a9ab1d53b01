use eframe::egui;

use crate::app::state::{AppState, SessionPhase};
use crate::app::theme::{colors, styles};
use crate::shared::session::Session;

pub mod composer_view;
pub mod feed_view;
pub mod sign_in_view;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    let signed_in_name = state.session().map(|s| s.display_name.clone());
    let signing_out = state.is_signing_out();

    egui::TopBottomPanel::top("top_bar")
        .frame(styles::top_bar_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("💫 BuddyBeam")
                        .size(18.0)
                        .strong()
                        .color(colors::ACCENT),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(name) = signed_in_name {
                        ui.add_enabled_ui(!signing_out, |ui| {
                            if ui.button("Sign out").clicked() {
                                state.handle_sign_out();
                            }
                        });
                        ui.colored_label(colors::TEXT_SECONDARY, format!("@{}", name));
                    }
                });
            });
        });
}

/// Transient notices pinned to the bottom edge, each dismissable.
pub fn render_notifications(ctx: &egui::Context, state: &mut AppState) {
    if state.notifications.is_empty() {
        return;
    }

    egui::TopBottomPanel::bottom("notices")
        .frame(
            egui::Frame::new()
                .fill(colors::BG_DARK)
                .inner_margin(egui::Margin::symmetric(12, 6)),
        )
        .show(ctx, |ui| {
            let mut dismissed = None;
            for (index, notice) in state.notifications.notices().iter().enumerate() {
                styles::notice_frame(notice.level).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(styles::notice_text_color(notice.level), &notice.text);
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.small_button("✕").clicked() {
                                    dismissed = Some(index);
                                }
                            },
                        );
                    });
                });
            }
            if let Some(index) = dismissed {
                state.notifications.dismiss(index);
            }
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    let frame = egui::Frame::new()
        .fill(colors::BG_DARK)
        .inner_margin(egui::Margin::same(0));

    egui::CentralPanel::default()
        .frame(frame)
        .show(ctx, |ui| match state.phase().clone() {
            SessionPhase::Resolving => render_loading(ui),
            SessionPhase::SignedOut => sign_in_view::render(ui, state),
            SessionPhase::SignedIn(session) => render_chat(ui, state, &session),
        });
}

fn render_loading(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.spinner();
        ui.add_space(12.0);
        ui.colored_label(colors::TEXT_LIGHT, "Loading BuddyBeam...");
    });
}

/// The authenticated surface: feed above, composer pinned below.
fn render_chat(ui: &mut egui::Ui, state: &mut AppState, session: &Session) {
    let composer_height = 96.0;
    let feed_height = (ui.available_height() - composer_height).max(0.0);

    ui.vertical(|ui| {
        ui.allocate_ui_with_layout(
            egui::vec2(ui.available_width(), feed_height),
            egui::Layout::top_down(egui::Align::LEFT),
            |ui| match &mut state.feed {
                Some(feed) => feed_view::render(ui, feed, session),
                None => render_loading(ui),
            },
        );
        composer_view::render(ui, state);
    });
}
