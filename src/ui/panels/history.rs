// CropCure - ui/panels/history.rs
//
// Prediction history table with CSV/JSON export.

use crate::app::state::{AppState, NotificationKind};
use crate::core::export::ExportFormat;
use crate::ui::theme;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let mut export_request = None;

    ui.set_max_width(theme::CONTENT_MAX_WIDTH);
    ui.add_space(12.0);
    ui.horizontal(|ui| {
        ui.heading("Prediction History");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let has_entries = !state.history.is_empty();
            ui.add_enabled_ui(has_entries, |ui| {
                for format in [ExportFormat::Json, ExportFormat::Csv] {
                    if ui.button(format!("Export {}", format.label())).clicked() {
                        export_request = Some(format);
                    }
                }
            });
        });
    });
    ui.label(
        egui::RichText::new(format!("{} saved prediction(s)", state.history.len()))
            .color(theme::MUTED),
    );
    ui.add_space(8.0);

    if state.history.is_empty() {
        ui.label(egui::RichText::new("No predictions yet. Analyze an image to get started.").weak());
    } else {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                egui::Grid::new("history_table")
                    .num_columns(4)
                    .striped(true)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        for header in ["Date", "Crop", "Prediction", "Confidence"] {
                            ui.label(egui::RichText::new(header).strong());
                        }
                        ui.end_row();

                        for entry in state.history.entries() {
                            ui.label(entry.date.format("%Y-%m-%d").to_string());
                            ui.label(&entry.crop_type);
                            ui.label(
                                egui::RichText::new(entry.prediction.label())
                                    .color(theme::diagnosis_colour(&entry.prediction)),
                            );
                            ui.label(format!("{:.1}%", entry.confidence));
                            ui.end_row();
                        }
                    });
            });
    }

    if let Some(format) = export_request {
        run_export(state, format);
    }
}

fn run_export(state: &mut AppState, format: ExportFormat) {
    let default_name = format!("cropcure-history.{}", format.extension());
    let Some(dest) = rfd::FileDialog::new()
        .add_filter(format.label(), &[format.extension()])
        .set_file_name(default_name)
        .save_file()
    else {
        return;
    };

    match state.export_history(&dest, format) {
        Ok(n) => state.notify(
            NotificationKind::Success,
            "Export complete",
            format!("Exported {n} prediction(s) to {}.", dest.display()),
        ),
        Err(e) => {
            tracing::error!(error = %e, "History export failed");
            state.notify(NotificationKind::Destructive, "Export failed", e.to_string());
        }
    }
}
