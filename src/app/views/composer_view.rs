//! Composer View
//!
//! The input bar at the bottom of the chat: attach control, text input, and
//! send button. Attach and send are disabled while a submission is in
//! flight; inline errors are shown above the bar with a dismiss action.

use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::{colors, styles};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    styles::composer_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        if let Some(error) = state.composer.error().map(str::to_string) {
            ui.horizontal(|ui| {
                ui.colored_label(colors::ERROR, error);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        state.composer.dismiss_error();
                    }
                });
            });
            ui.add_space(4.0);
        }

        if state.composer.show_attach_prompt {
            render_attach_prompt(ui, state);
            ui.add_space(4.0);
        }

        ui.horizontal(|ui| {
            let sending = state.composer.is_sending();

            ui.add_enabled_ui(!sending, |ui| {
                if ui.button("📎").clicked() {
                    state.composer.show_attach_prompt = !state.composer.show_attach_prompt;
                }
            });

            let staged_name = state.composer.attachment().map(|a| a.file_name.clone());
            if let Some(name) = staged_name {
                ui.colored_label(colors::ACCENT_ALT, format!("🖼 {}", name));
                if !sending && ui.small_button("✕").clicked() {
                    state.composer.clear_attachment();
                }
            }

            let mut submit = false;

            let response = ui.add(
                egui::TextEdit::singleline(&mut state.composer.text)
                    .hint_text("Type a message...")
                    .desired_width((ui.available_width() - 48.0).max(80.0)),
            );
            let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if response.lost_focus() && enter_pressed {
                submit = true;
            }

            if sending {
                ui.spinner();
            } else {
                ui.add_enabled_ui(state.composer.can_submit(), |ui| {
                    if ui.button("➤").clicked() {
                        submit = true;
                    }
                });
            }

            if submit {
                state.submit_message();
            }
        });
    });
}

fn render_attach_prompt(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.colored_label(colors::TEXT_SECONDARY, "File path:");
        ui.add(
            egui::TextEdit::singleline(&mut state.composer.attach_path_input)
                .desired_width((ui.available_width() - 90.0).max(80.0)),
        );
        if ui.button("Attach").clicked() {
            let path = state.composer.attach_path_input.trim().to_string();
            if !path.is_empty() {
                state.composer.stage_from_path(&path);
            }
            state.composer.attach_path_input.clear();
            state.composer.show_attach_prompt = false;
        }
    });
}
