// CropCure - ui/panels/predict.rs
//
// Predict page: upload card (picker + drag-and-drop), preview, analysis
// progress, and the result card.
//
// The decoded preview lives in the flow as a `PreviewHandle`; this panel only
// mirrors it into a GPU texture. The cache is keyed on the handle id so a
// replaced or released preview drops its texture on the next frame.

use crate::app::predict::{PredictFlow, PredictPhase};
use crate::app::state::AppState;
use crate::core::model::PredictionResult;
use crate::ui::theme;
use crate::util::constants::ACCEPTED_EXTENSIONS;
use std::path::PathBuf;

/// Texture mirror of the flow's current preview.
#[derive(Default)]
pub struct PreviewTextureCache {
    current: Option<(u64, egui::TextureHandle)>,
}

impl PreviewTextureCache {
    /// Return the texture for the flow's preview, uploading it on first use.
    /// Drops the cached texture when the preview is gone or replaced.
    fn sync(&mut self, ctx: &egui::Context, flow: Option<&PredictFlow>) -> Option<&egui::TextureHandle> {
        let preview = flow.and_then(|f| f.image()).map(|img| img.preview());

        let Some(preview) = preview else {
            if self.current.take().is_some() {
                tracing::trace!("Preview texture released");
            }
            return None;
        };

        let stale = self
            .current
            .as_ref()
            .map_or(true, |(id, _)| *id != preview.id());
        if stale {
            let pixels = preview.image();
            let colour = egui::ColorImage::from_rgba_unmultiplied(
                [pixels.width as usize, pixels.height as usize],
                &pixels.rgba,
            );
            let texture = ctx.load_texture(
                format!("preview-{}", preview.id()),
                colour,
                egui::TextureOptions::LINEAR,
            );
            self.current = Some((preview.id(), texture));
        }
        self.current.as_ref().map(|(_, t)| t)
    }
}

/// Things the user asked for this frame; applied after rendering so the flow
/// is not borrowed while the state is mutated.
#[derive(Default)]
struct Actions {
    pick: bool,
    dropped_path: Option<PathBuf>,
    dropped_bytes: Option<(String, Vec<u8>)>,
    analyze: bool,
    reset: bool,
    save: bool,
}

/// Render the Predict page.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, textures: &mut PreviewTextureCache) {
    let mut actions = Actions::default();
    collect_dropped_files(ui.ctx(), &mut actions);

    let texture = textures.sync(ui.ctx(), state.predict.as_ref()).cloned();
    let saved = state.current_result_saved();

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.set_max_width(theme::CONTENT_MAX_WIDTH);
        ui.add_space(12.0);
        ui.heading("Crop Disease Prediction");
        ui.label(
            egui::RichText::new("Upload a clear photo of an affected leaf to get a diagnosis.")
                .color(theme::MUTED),
        );
        ui.add_space(12.0);

        let Some(flow) = state.predict.as_ref() else {
            ui.spinner();
            return;
        };

        match flow.phase() {
            PredictPhase::Idle => render_upload_card(ui, flow, &mut actions),
            PredictPhase::Selected | PredictPhase::Analyzing | PredictPhase::Complete => {
                render_selected(ui, flow, texture.as_ref(), &mut actions);
            }
        }

        if let Some(result) = flow.result() {
            ui.add_space(16.0);
            render_result_card(ui, result, saved, &mut actions);
        }
    });

    apply(state, actions);
}

fn collect_dropped_files(ctx: &egui::Context, actions: &mut Actions) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    // Only the first dropped file is used.
    let Some(file) = dropped.into_iter().next() else {
        return;
    };
    if let Some(path) = file.path {
        actions.dropped_path = Some(path);
    } else if let Some(bytes) = file.bytes {
        actions.dropped_bytes = Some((file.name, bytes.to_vec()));
    }
}

fn render_upload_card(ui: &mut egui::Ui, flow: &PredictFlow, actions: &mut Actions) {
    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let mut frame = egui::Frame::group(ui.style()).inner_margin(egui::Margin::same(24));
    if hovering {
        frame = frame.stroke(egui::Stroke::new(2.0, theme::PRIMARY));
    }

    frame.show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("\u{1f4e4}").size(36.0));
            ui.label(egui::RichText::new("Drag and drop an image here").strong());
            ui.label(egui::RichText::new("or").weak());
            if ui.button("Browse files\u{2026}").clicked() {
                actions.pick = true;
            }
            ui.add_space(6.0);
            let limit = match flow.settings().max_file_size_bytes {
                Some(max) => format!("JPEG or PNG, up to {}", format_size(max)),
                None => "JPEG or PNG".to_string(),
            };
            ui.label(egui::RichText::new(limit).small().color(theme::MUTED));
        });
    });
}

fn render_selected(
    ui: &mut egui::Ui,
    flow: &PredictFlow,
    texture: Option<&egui::TextureHandle>,
    actions: &mut Actions,
) {
    let Some(image) = flow.image() else {
        return;
    };

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui| {
            if let Some(texture) = texture {
                ui.add(
                    egui::Image::new(egui::load::SizedTexture::from_handle(texture)).max_size(
                        egui::vec2(ui.available_width(), theme::PREVIEW_MAX_HEIGHT),
                    ),
                );
            }
            ui.label(
                egui::RichText::new(format!(
                    "{} \u{00b7} {}",
                    image.name(),
                    format_size(image.size_bytes)
                ))
                .small()
                .color(theme::MUTED),
            );
        });

        ui.add_space(8.0);

        if let Some(progress) = flow.progress() {
            ui.add(
                egui::ProgressBar::new(progress)
                    .text("Analyzing\u{2026}")
                    .animate(true),
            );
            return;
        }

        ui.horizontal(|ui| {
            let analyze = egui::Button::new(
                egui::RichText::new("Analyze Image").color(egui::Color32::WHITE),
            )
            .fill(theme::PRIMARY_DARK);
            if ui.add(analyze).clicked() {
                actions.analyze = true;
            }
            if ui.button("Choose Different Image").clicked() {
                actions.reset = true;
            }
        });
    });
}

fn render_result_card(
    ui: &mut egui::Ui,
    result: &PredictionResult,
    saved: bool,
    actions: &mut Actions,
) {
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.5, theme::diagnosis_colour(&result.predicted)))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("Analysis Result").size(18.0).strong());
            ui.add_space(6.0);

            egui::Grid::new("predict_result")
                .num_columns(2)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("Diagnosis").color(theme::MUTED));
                    ui.label(
                        egui::RichText::new(result.predicted.label())
                            .strong()
                            .color(theme::diagnosis_colour(&result.predicted)),
                    );
                    ui.end_row();

                    ui.label(egui::RichText::new("Confidence").color(theme::MUTED));
                    ui.add(
                        egui::ProgressBar::new((result.confidence / 100.0) as f32)
                            .text(format!("{:.1}%", result.confidence))
                            .desired_width(200.0),
                    );
                    ui.end_row();
                });

            if let Some(recommendation) = &result.recommendation {
                ui.add_space(8.0);
                ui.label(egui::RichText::new("Recommendation").strong());
                ui.label(recommendation);
            }

            ui.add_space(8.0);
            let label = if saved { "Saved" } else { "Save Result" };
            if ui.add_enabled(!saved, egui::Button::new(label)).clicked() {
                actions.save = true;
            }
        });
}

fn apply(state: &mut AppState, actions: Actions) {
    if actions.pick {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", ACCEPTED_EXTENSIONS)
            .pick_file()
        {
            state.select_image(&path);
        }
    }
    if let Some(path) = actions.dropped_path {
        state.select_image(&path);
    }
    if let Some((name, bytes)) = actions.dropped_bytes {
        state.select_dropped(&name, bytes);
    }
    if actions.analyze {
        if let Some(flow) = state.predict.as_mut() {
            flow.analyze();
        }
    }
    if actions.reset {
        if let Some(flow) = state.predict.as_mut() {
            flow.reset();
        }
    }
    if actions.save {
        state.save_current_result();
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MB", b / MIB)
    } else if b >= KIB {
        format!("{:.0} KB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}
