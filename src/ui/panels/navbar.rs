// CropCure - ui/panels/navbar.rs
//
// Top navigation bar: brand, page links (signed-in only), theme toggle,
// About button, and the sign-in / sign-out control.

use crate::app::state::{AppState, Route, Screen};
use crate::ui::theme;

const NAV_LINKS: &[(Route, &str)] = &[
    (Route::Dashboard, "Dashboard"),
    (Route::Predict, "Predict"),
    (Route::History, "History"),
    (Route::Guide, "Guide"),
];

/// Render the navigation bar contents.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let current = state.screen();

    ui.horizontal_centered(|ui| {
        let brand = egui::RichText::new("\u{1f33e} CropCure")
            .size(18.0)
            .strong()
            .color(theme::PRIMARY);
        if ui.add(egui::Label::new(brand).sense(egui::Sense::click())).clicked() {
            state.navigate(Route::Landing);
        }

        ui.add_space(16.0);

        if state.session.is_signed_in() {
            for (route, label) in NAV_LINKS {
                let selected = current == Screen::Page(*route);
                if ui.selectable_label(selected, *label).clicked() {
                    state.navigate(*route);
                }
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .small_button("\u{24d8}")
                .on_hover_text("About CropCure")
                .clicked()
            {
                state.show_about = true;
            }

            let theme_icon = if state.config.dark_mode {
                "\u{2600}"
            } else {
                "\u{1f319}"
            };
            if ui
                .small_button(theme_icon)
                .on_hover_text("Toggle light/dark theme")
                .clicked()
            {
                state.config.dark_mode = !state.config.dark_mode;
            }

            ui.separator();
            render_account(ui, state);
        });
    });
}

fn render_account(ui: &mut egui::Ui, state: &mut AppState) {
    let busy = state.session.loading();

    if let Some(user) = state.session.user() {
        let initials = user.initials();
        let name = user.name.clone();
        let email = user.email.clone();

        if ui.add_enabled(!busy, egui::Button::new("Sign out")).clicked() {
            state.sign_out();
        }
        ui.label(egui::RichText::new(name).strong())
            .on_hover_text(email);
        ui.label(
            egui::RichText::new(format!(" {initials} "))
                .strong()
                .color(egui::Color32::WHITE)
                .background_color(theme::PRIMARY_DARK),
        );
    } else {
        let label = if busy {
            "Signing in\u{2026}"
        } else {
            "Sign in with Google"
        };
        if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
            state.sign_in();
        }
        if busy {
            ui.spinner();
        }
    }
}
