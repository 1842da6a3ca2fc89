// CropCure - ui/panels/toasts.rs
//
// Transient notifications stacked in the bottom-right corner. Expiry is
// handled by `AppState::tick`; clicking a toast dismisses it early.

use crate::app::state::AppState;
use crate::ui::theme;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if state.notifications.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(theme::TOAST_WIDTH);
            for (index, note) in state.notifications.iter().enumerate() {
                let response = egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.5, theme::notification_colour(note.kind)))
                    .show(ui, |ui| {
                        ui.set_width(theme::TOAST_WIDTH);
                        ui.label(egui::RichText::new(&note.title).strong());
                        if !note.description.is_empty() {
                            ui.label(&note.description);
                        }
                    })
                    .response
                    .interact(egui::Sense::click());
                if response.clicked() {
                    dismissed = Some(index);
                }
                ui.add_space(6.0);
            }
        });

    if let Some(index) = dismissed {
        state.notifications.remove(index);
    }
}
