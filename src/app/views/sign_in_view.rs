use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::colors;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let signing_in = state.is_signing_in();

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);

        ui.label(
            egui::RichText::new("💫 BuddyBeam")
                .size(32.0)
                .strong()
                .color(colors::ACCENT),
        );
        ui.add_space(8.0);
        ui.colored_label(colors::TEXT_SECONDARY, "Sign in to join the conversation");
        ui.add_space(24.0);

        if signing_in {
            ui.spinner();
            ui.add_space(8.0);
            ui.colored_label(colors::TEXT_LIGHT, "Signing in...");
        } else {
            let button = egui::Button::new(
                egui::RichText::new("Sign in").color(colors::BG_DARK).strong(),
            )
            .fill(colors::ACCENT);
            if ui.add_sized([200.0, 36.0], button).clicked() {
                state.handle_sign_in();
            }
        }
    });
}
