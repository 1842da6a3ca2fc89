// CropCure - ui/panels/loading.rs

/// Placeholder while the stored session is being read or an auth operation
/// is in flight.
pub fn render(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(120.0);
        ui.spinner();
        ui.label(egui::RichText::new("Loading\u{2026}").weak());
    });
}
