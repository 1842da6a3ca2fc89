// CropCure - core/classifier.rs
//
// The pluggable classification seam and its mock implementation.
//
// A real inference backend implements `Classifier` and is handed to the
// prediction flow unchanged; the flow only relies on:
//   - `classify` returning a label from `DiseaseLabel::all()`,
//   - the label→recommendation mapping in `recommendation_for`.

use crate::core::model::{DiseaseLabel, ImageInput, PredictionResult};
use crate::util::constants::{MOCK_CONFIDENCE_MAX, MOCK_CONFIDENCE_MIN};
use crate::util::error::ClassifyError;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Advice shown for a healthy crop.
pub const HEALTHY_RECOMMENDATION: &str =
    "Your crop appears healthy. Continue with your current care routine.";

/// Advice for bacterial leaf blight.
pub const BLIGHT_RECOMMENDATION: &str =
    "Consider using copper-based bactericides and ensure proper drainage.";

/// Advice for brown spot.
pub const BROWN_SPOT_RECOMMENDATION: &str =
    "Apply fungicides containing propiconazole or azoxystrobin. Ensure balanced nutrition.";

/// Advice for every label without a specific entry.
pub const GENERIC_RECOMMENDATION: &str =
    "Consult with a local agricultural expert for treatment options.";

/// Fixed label→advice lookup.
pub fn recommendation_for(label: DiseaseLabel) -> &'static str {
    match label {
        DiseaseLabel::Healthy => HEALTHY_RECOMMENDATION,
        DiseaseLabel::BacterialLeafBlight => BLIGHT_RECOMMENDATION,
        DiseaseLabel::BrownSpot => BROWN_SPOT_RECOMMENDATION,
        _ => GENERIC_RECOMMENDATION,
    }
}

/// Anything that can turn an uploaded image into a prediction.
///
/// Called from the analysis worker thread, hence `Send + Sync`.
pub trait Classifier: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    fn classify(&self, input: &ImageInput) -> Result<PredictionResult, ClassifyError>;
}

/// Produce one mock prediction from `rng`.
///
/// Label is uniform over `DiseaseLabel::all()`, confidence is uniform over
/// [MOCK_CONFIDENCE_MIN, MOCK_CONFIDENCE_MAX).
pub fn mock_prediction<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> PredictionResult {
    let labels = DiseaseLabel::all();
    let predicted = labels[rng.gen_range(0..labels.len())];
    let confidence = rng.gen_range(MOCK_CONFIDENCE_MIN..MOCK_CONFIDENCE_MAX);

    PredictionResult {
        predicted,
        confidence,
        recommendation: Some(recommendation_for(predicted).to_string()),
        analyzed_at: now,
    }
}

/// Stand-in classifier that ignores the image content.
#[derive(Debug)]
pub struct MockClassifier {
    rng: Mutex<StdRng>,
}

impl MockClassifier {
    /// Entropy-seeded classifier for normal runs.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic classifier: the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    fn classify(&self, input: &ImageInput) -> Result<PredictionResult, ClassifyError> {
        if input.bytes.is_empty() {
            return Err(ClassifyError::InvalidInput {
                reason: format!("'{}' is empty", input.name),
            });
        }

        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let result = mock_prediction(&mut *rng, Utc::now());

        tracing::debug!(
            image = %input.name,
            mime = %input.mime,
            predicted = %result.predicted,
            confidence = result.confidence,
            "Mock classification produced"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ImageMime;
    use std::sync::Arc;

    fn input() -> ImageInput {
        ImageInput {
            name: "leaf.png".to_string(),
            mime: ImageMime::Png,
            bytes: Arc::from(vec![1u8, 2, 3]),
        }
    }

    #[test]
    fn test_mock_results_respect_confidence_range_and_label_set() {
        let classifier = MockClassifier::seeded(7);
        for _ in 0..2_000 {
            let r = classifier.classify(&input()).unwrap();
            assert!(
                (70.0..100.0).contains(&r.confidence),
                "confidence out of range: {}",
                r.confidence
            );
            assert!(DiseaseLabel::all().contains(&r.predicted));
        }
    }

    #[test]
    fn test_recommendation_is_deterministic_per_label() {
        let classifier = MockClassifier::seeded(11);
        for _ in 0..2_000 {
            let r = classifier.classify(&input()).unwrap();
            assert_eq!(
                r.recommendation.as_deref(),
                Some(recommendation_for(r.predicted))
            );
            if r.predicted.is_healthy() {
                assert_eq!(r.recommendation.as_deref(), Some(HEALTHY_RECOMMENDATION));
            }
        }
    }

    #[test]
    fn test_every_label_is_reachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..5_000 {
            seen.insert(mock_prediction(&mut rng, Utc::now()).predicted);
        }
        assert_eq!(seen.len(), DiseaseLabel::all().len());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = MockClassifier::seeded(42);
        let b = MockClassifier::seeded(42);
        for _ in 0..20 {
            let ra = a.classify(&input()).unwrap();
            let rb = b.classify(&input()).unwrap();
            assert_eq!(ra.predicted, rb.predicted);
            assert_eq!(ra.confidence, rb.confidence);
        }
    }

    #[test]
    fn test_specific_and_fallback_recommendations() {
        assert_eq!(
            recommendation_for(DiseaseLabel::BacterialLeafBlight),
            BLIGHT_RECOMMENDATION
        );
        assert_eq!(
            recommendation_for(DiseaseLabel::BrownSpot),
            BROWN_SPOT_RECOMMENDATION
        );
        assert_eq!(recommendation_for(DiseaseLabel::Tungro), GENERIC_RECOMMENDATION);
        assert_eq!(
            recommendation_for(DiseaseLabel::NarrowBrownSpot),
            GENERIC_RECOMMENDATION
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let mut empty = input();
        empty.bytes = Arc::from(Vec::new());
        assert!(matches!(
            MockClassifier::seeded(1).classify(&empty),
            Err(ClassifyError::InvalidInput { .. })
        ));
    }
}
