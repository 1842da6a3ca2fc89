// CropCure - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Signed-in user
// =============================================================================

/// The signed-in user as held in memory and in durable storage.
///
/// The stored JSON uses the keys `id`, `name`, `email` and `photoURL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Opaque provider identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address. Never written to logs.
    pub email: String,

    /// Avatar image URL, if the provider supplies one.
    #[serde(
        rename = "photoURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar_url: Option<String>,
}

impl AuthUser {
    /// A stored record is usable only if it carries an identifier.
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Up to two upper-case initials for the avatar placeholder.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

// =============================================================================
// Disease labels
// =============================================================================

/// Closed set of classes the classifier can report.
///
/// Serialised as the human-readable label so exported history and any
/// future model output share one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseLabel {
    Healthy,
    #[serde(rename = "Bacterial Leaf Blight")]
    BacterialLeafBlight,
    #[serde(rename = "Brown Spot")]
    BrownSpot,
    #[serde(rename = "Leaf Smut")]
    LeafSmut,
    Blast,
    Hispa,
    Tungro,
    #[serde(rename = "Bacterial Leaf Streak")]
    BacterialLeafStreak,
    #[serde(rename = "Narrow Brown Spot")]
    NarrowBrownSpot,
    #[serde(rename = "False Smut")]
    FalseSmut,
}

impl DiseaseLabel {
    /// All labels in model output order.
    pub fn all() -> &'static [DiseaseLabel] {
        &[
            DiseaseLabel::Healthy,
            DiseaseLabel::BacterialLeafBlight,
            DiseaseLabel::BrownSpot,
            DiseaseLabel::LeafSmut,
            DiseaseLabel::Blast,
            DiseaseLabel::Hispa,
            DiseaseLabel::Tungro,
            DiseaseLabel::BacterialLeafStreak,
            DiseaseLabel::NarrowBrownSpot,
            DiseaseLabel::FalseSmut,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            DiseaseLabel::Healthy => "Healthy",
            DiseaseLabel::BacterialLeafBlight => "Bacterial Leaf Blight",
            DiseaseLabel::BrownSpot => "Brown Spot",
            DiseaseLabel::LeafSmut => "Leaf Smut",
            DiseaseLabel::Blast => "Blast",
            DiseaseLabel::Hispa => "Hispa",
            DiseaseLabel::Tungro => "Tungro",
            DiseaseLabel::BacterialLeafStreak => "Bacterial Leaf Streak",
            DiseaseLabel::NarrowBrownSpot => "Narrow Brown Spot",
            DiseaseLabel::FalseSmut => "False Smut",
        }
    }

    /// Parse a display label (case-insensitive).
    pub fn from_label(s: &str) -> Option<DiseaseLabel> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|l| l.label().eq_ignore_ascii_case(s))
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, DiseaseLabel::Healthy)
    }
}

impl std::fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Prediction result
// =============================================================================

/// Output of one completed analysis. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted class.
    pub predicted: DiseaseLabel,

    /// Confidence in percent, 0-100.
    pub confidence: f64,

    /// Care or treatment advice for the predicted class.
    pub recommendation: Option<String>,

    /// When the classifier produced this result.
    pub analyzed_at: DateTime<Utc>,
}

// =============================================================================
// Uploaded image data
// =============================================================================

/// Image container formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }

    pub fn from_mime(mime: &str) -> Option<ImageMime> {
        match mime {
            "image/jpeg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated image bytes handed to a classifier.
///
/// Bytes are shared so the analysis worker can hold them without copying.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// File name as shown to the user.
    pub name: String,
    pub mime: ImageMime,
    pub bytes: Arc<[u8]>,
}

/// Decoded RGBA8 preview pixels, downscaled for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

// =============================================================================
// History
// =============================================================================

/// One row of the prediction history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub date: NaiveDate,
    pub crop_type: String,
    pub prediction: DiseaseLabel,
    /// Confidence in percent, rounded to one decimal place.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_json_uses_photo_url_key() {
        let user = AuthUser {
            id: "u1".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            avatar_url: Some("https://example.com/a.png".to_string()),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"photoURL\""));

        let back: AuthUser = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_auth_user_without_avatar_deserialises() {
        let json = r#"{"id":"u1","name":"A","email":"a@b.c"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.avatar_url, None);
        assert!(user.is_well_formed());
    }

    #[test]
    fn test_blank_id_is_not_well_formed() {
        let json = r#"{"id":"  ","name":"A","email":"a@b.c"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert!(!user.is_well_formed());
    }

    #[test]
    fn test_initials() {
        let mut user: AuthUser =
            serde_json::from_str(r#"{"id":"1","name":"test user","email":""}"#).unwrap();
        assert_eq!(user.initials(), "TU");
        user.name = "Ada".to_string();
        assert_eq!(user.initials(), "A");
    }

    #[test]
    fn test_label_set_is_closed_and_starts_with_healthy() {
        let all = DiseaseLabel::all();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], DiseaseLabel::Healthy);
        for label in all {
            assert_eq!(DiseaseLabel::from_label(label.label()), Some(*label));
        }
        assert_eq!(DiseaseLabel::from_label("brown spot"), Some(DiseaseLabel::BrownSpot));
        assert_eq!(DiseaseLabel::from_label("Rust"), None);
    }

    #[test]
    fn test_label_serialises_as_display_text() {
        let json = serde_json::to_string(&DiseaseLabel::NarrowBrownSpot).unwrap();
        assert_eq!(json, "\"Narrow Brown Spot\"");
    }
}
