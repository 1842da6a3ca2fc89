// CropCure - ui/panels/about.rs
//
// About dialog: shown when the user clicks the ⓘ button in the navigation bar.
// Rendered as a centred, non-resizable, non-collapsible modal window.

use crate::app::state::AppState;
use crate::ui::theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the About dialog (if `state.show_about` is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_about {
        return;
    }

    let mut open = true;
    egui::Window::new("About CropCure")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("\u{1f33e}  CropCure")
                        .size(28.0)
                        .strong()
                        .color(theme::PRIMARY),
                );
                ui.add_space(4.0);
                ui.label(egui::RichText::new(format!("v{VERSION}")).size(14.0).weak());
            });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label("Crop disease detection from leaf photos.");
                ui.label(
                    egui::RichText::new(
                        "Diagnoses are simulated and are not a substitute for an agronomist.",
                    )
                    .small()
                    .color(theme::ACCENT),
                );
            });

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(6.0);

            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "Signed in via {}",
                        state.session.provider_name()
                    ))
                    .small()
                    .weak(),
                );
                ui.label(egui::RichText::new("Built with Rust & egui").small().weak());
            });

            ui.add_space(8.0);
        });

    if !open {
        state.show_about = false;
    }
}
