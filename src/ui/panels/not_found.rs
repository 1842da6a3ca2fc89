// CropCure - ui/panels/not_found.rs

use crate::app::state::{AppState, Route};
use crate::ui::theme;

/// Shown for unknown routes (e.g. a bad `--route` argument).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(egui::RichText::new("404").size(48.0).strong().color(theme::MUTED));
        ui.label(egui::RichText::new("Oops! Page not found").size(18.0));
        ui.add_space(12.0);
        if ui.button("Return to Home").clicked() {
            state.navigate(Route::Landing);
        }
    });
}
