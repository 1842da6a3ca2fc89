// CropCure - ui/theme.rs
//
// Colour scheme, diagnosis colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::app::state::NotificationKind;
use crate::core::model::DiseaseLabel;
use egui::Color32;

/// Brand colours.
pub const PRIMARY: Color32 = Color32::from_rgb(34, 197, 94); // Green 500
pub const PRIMARY_DARK: Color32 = Color32::from_rgb(21, 128, 61); // Green 700
pub const ACCENT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600
pub const DESTRUCTIVE: Color32 = Color32::from_rgb(220, 38, 38); // Red 600
pub const MUTED: Color32 = Color32::from_rgb(107, 114, 128); // Gray 500

/// Colour for a diagnosis label.
pub fn diagnosis_colour(label: &DiseaseLabel) -> Color32 {
    if label.is_healthy() {
        PRIMARY
    } else {
        ACCENT
    }
}

/// Border colour for a toast.
pub fn notification_colour(kind: NotificationKind) -> Color32 {
    match kind {
        NotificationKind::Info => MUTED,
        NotificationKind::Success => PRIMARY,
        NotificationKind::Destructive => DESTRUCTIVE,
    }
}

/// Base visuals with the brand accent applied to selections and links.
pub fn visuals(dark_mode: bool) -> egui::Visuals {
    let mut visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.selection.bg_fill = PRIMARY_DARK;
    visuals.hyperlink_color = PRIMARY;
    visuals
}

/// Layout constants.
pub const CONTENT_MAX_WIDTH: f32 = 880.0;
pub const PREVIEW_MAX_HEIGHT: f32 = 320.0;
pub const CARD_MIN_WIDTH: f32 = 240.0;
pub const TOAST_WIDTH: f32 = 320.0;
pub const NAVBAR_HEIGHT: f32 = 36.0;
