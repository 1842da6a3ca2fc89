// CropCure - ui/panels/dashboard.rs
//
// Signed-in home: greeting, shortcut cards, and a diagnosis breakdown of the
// history list.

use crate::app::state::{AppState, Route};
use crate::ui::theme;

const SHORTCUTS: &[(Route, &str, &str)] = &[
    (
        Route::Predict,
        "\u{1f52c} Analyze a crop",
        "Upload a leaf photo for diagnosis.",
    ),
    (
        Route::History,
        "\u{1f4dc} Prediction history",
        "Review and export earlier results.",
    ),
    (
        Route::Guide,
        "\u{1f4d6} Disease guide",
        "Symptoms and treatments by crop.",
    ),
];

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let greeting = state
        .session
        .user()
        .map(|u| format!("Welcome back, {}", u.name))
        .unwrap_or_else(|| "Welcome".to_string());

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.set_max_width(theme::CONTENT_MAX_WIDTH);
        ui.add_space(16.0);
        ui.heading(greeting);
        ui.label(egui::RichText::new("What would you like to do today?").color(theme::MUTED));
        ui.add_space(16.0);

        let mut target = None;
        ui.horizontal_wrapped(|ui| {
            for (route, title, body) in SHORTCUTS {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_min_width(theme::CARD_MIN_WIDTH);
                    ui.label(egui::RichText::new(*title).size(16.0).strong());
                    ui.label(egui::RichText::new(*body).color(theme::MUTED));
                    ui.add_space(6.0);
                    if ui.button("Open").clicked() {
                        target = Some(*route);
                    }
                });
            }
        });
        if let Some(route) = target {
            state.navigate(route);
        }

        ui.add_space(24.0);
        ui.label(egui::RichText::new("Diagnoses so far").strong());
        ui.separator();

        let counts = state.history.label_counts();
        if counts.is_empty() {
            ui.label(egui::RichText::new("No predictions recorded yet.").weak());
        } else {
            egui::Grid::new("dashboard_counts")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (label, count) in counts {
                        ui.label(egui::RichText::new(label.label()).color(theme::diagnosis_colour(&label)));
                        ui.label(count.to_string());
                        ui.end_row();
                    }
                });
        }
    });
}
