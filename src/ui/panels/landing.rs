// CropCure - ui/panels/landing.rs
//
// Public landing page: hero, feature summary, and the sign-in call to action.

use crate::app::state::AppState;
use crate::ui::theme;

const FEATURES: &[(&str, &str, &str)] = &[
    (
        "\u{1f4f7}",
        "Upload a photo",
        "Take a clear picture of an affected leaf and upload it.",
    ),
    (
        "\u{1f52c}",
        "Get a diagnosis",
        "Receive a predicted disease with a confidence score.",
    ),
    (
        "\u{1f331}",
        "Treat your crop",
        "Follow the recommendation and track results over time.",
    ),
];

/// Render the landing page.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.set_max_width(theme::CONTENT_MAX_WIDTH);
            ui.add_space(48.0);
            ui.label(
                egui::RichText::new("Detect crop diseases early")
                    .size(32.0)
                    .strong(),
            );
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new(
                    "Upload a photo of a rice, wheat or corn leaf and get an instant \
                     diagnosis with treatment advice.",
                )
                .size(16.0)
                .color(theme::MUTED),
            );
            ui.add_space(24.0);

            let busy = state.session.loading();
            let cta = egui::Button::new(
                egui::RichText::new(format!(
                    "Get started with {}",
                    state.session.provider_name()
                ))
                .size(16.0)
                .color(egui::Color32::WHITE),
            )
            .fill(theme::PRIMARY_DARK)
            .min_size(egui::vec2(220.0, 40.0));
            if ui.add_enabled(!busy, cta).clicked() {
                state.sign_in();
            }

            ui.add_space(48.0);
        });

        ui.columns(FEATURES.len(), |columns| {
            for (column, (icon, title, body)) in columns.iter_mut().zip(FEATURES) {
                egui::Frame::group(column.style()).show(column, |ui| {
                    ui.set_min_height(120.0);
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(*icon).size(28.0));
                        ui.label(egui::RichText::new(*title).strong());
                        ui.label(egui::RichText::new(*body).color(theme::MUTED));
                    });
                });
            }
        });
    });
}
