// CropCure - gui.rs
//
// Top-level eframe::App implementation.
// Drains background work, applies the route guard, and wires the panels.

use crate::app::state::{AppState, Route, Screen};
use crate::ui;
use crate::ui::panels::predict::PreviewTextureCache;

/// The CropCure application.
pub struct CropCureApp {
    pub state: AppState,
    preview_textures: PreviewTextureCache,
    applied_dark_mode: Option<bool>,
}

impl CropCureApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            preview_textures: PreviewTextureCache::default(),
            applied_dark_mode: None,
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let dark = self.state.config.dark_mode;
        if self.applied_dark_mode != Some(dark) {
            ctx.set_visuals(ui::theme::visuals(dark));
            self.applied_dark_mode = Some(dark);
        }
    }
}

impl eframe::App for CropCureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll session and analysis workers; keep repainting while either is busy
        // so results and progress appear promptly.
        let busy = self.state.tick(std::time::Instant::now());
        if busy {
            ctx.request_repaint_after(std::time::Duration::from_millis(
                crate::util::constants::ANALYSIS_CANCEL_CHECK_INTERVAL_MS,
            ));
        }

        self.apply_theme(ctx);

        // Navigation bar
        egui::TopBottomPanel::top("navbar")
            .exact_height(ui::theme::NAVBAR_HEIGHT)
            .show(ctx, |ui| {
                ui::panels::navbar::render(ui, &mut self.state);
            });

        // Debug status bar
        if self.state.debug_mode {
            egui::TopBottomPanel::bottom("debug_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "route {} \u{00b7} screen {:?} \u{00b7} session rev {} \u{00b7} live previews {}",
                            self.state.route.path(),
                            self.state.screen(),
                            self.state.session.revision(),
                            self.state.previews.live(),
                        ))
                        .small()
                        .monospace(),
                    );
                });
            });
        }

        // Central panel
        egui::CentralPanel::default().show(ctx, |ui| match self.state.screen() {
            Screen::Loading => ui::panels::loading::render(ui),
            Screen::Page(Route::Landing) => ui::panels::landing::render(ui, &mut self.state),
            Screen::Page(Route::Dashboard) => ui::panels::dashboard::render(ui, &mut self.state),
            Screen::Page(Route::Predict) => {
                ui::panels::predict::render(ui, &mut self.state, &mut self.preview_textures)
            }
            Screen::Page(Route::History) => ui::panels::history::render(ui, &mut self.state),
            Screen::Page(Route::Guide) => ui::panels::guide::render(ui, &mut self.state),
            Screen::Page(Route::NotFound) => ui::panels::not_found::render(ui, &mut self.state),
        });

        // Release the preview texture as soon as the Predict page goes away.
        if self.state.predict.is_none() {
            self.preview_textures = PreviewTextureCache::default();
        }

        // Overlays
        ui::panels::toasts::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }
}
