// CropCure - ui/panels/guide.rs
//
// Disease guide with one tab per crop.

use crate::app::state::AppState;
use crate::core::guide::{Crop, DiseaseArticle};
use crate::ui::theme;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.set_max_width(theme::CONTENT_MAX_WIDTH);
    ui.add_space(12.0);
    ui.heading("Disease Guide");
    ui.label(
        egui::RichText::new("Common diseases, their symptoms, and how to treat them.")
            .color(theme::MUTED),
    );
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        for crop in Crop::all() {
            ui.selectable_value(&mut state.guide_tab, *crop, crop.label());
        }
    });
    ui.separator();

    let articles = state.guide_tab.articles();
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            if articles.is_empty() {
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(format!(
                        "{} disease information coming soon.",
                        state.guide_tab.label()
                    ))
                    .weak(),
                );
                return;
            }
            for article in articles {
                render_article(ui, article);
                ui.add_space(12.0);
            }
        });
}

fn render_article(ui: &mut egui::Ui, article: &DiseaseArticle) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.label(egui::RichText::new(article.name).size(17.0).strong());
        ui.label(
            egui::RichText::new(article.pathogen)
                .italics()
                .color(theme::MUTED),
        );
        ui.add_space(4.0);
        ui.label(article.summary);

        ui.columns(2, |columns| {
            columns[0].label(egui::RichText::new("Symptoms").strong());
            for symptom in article.symptoms {
                columns[0].label(format!("\u{2022} {symptom}"));
            }
            columns[1].label(egui::RichText::new("Treatment").strong());
            for step in article.treatment {
                columns[1].label(format!("\u{2022} {step}"));
            }
        });
    });
}
