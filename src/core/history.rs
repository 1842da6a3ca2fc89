// CropCure - core/history.rs
//
// Prediction history held for the current run.
//
// Seeded with sample rows so the screen is never empty on first launch.
// Saved results are kept in memory only; nothing here touches disk.

use crate::core::model::{DiseaseLabel, HistoryEntry, PredictionResult};
use crate::util::constants::MAX_HISTORY_ENTRIES;
use chrono::NaiveDate;

/// Sample rows shown before any result is saved.
pub fn sample_entries() -> Vec<HistoryEntry> {
    let row = |id: &str, (y, m, d): (i32, u32, u32), crop: &str, prediction, confidence| {
        HistoryEntry {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            crop_type: crop.to_string(),
            prediction,
            confidence,
        }
    };

    vec![
        row("1", (2023, 6, 15), "Rice", DiseaseLabel::BacterialLeafBlight, 92.5),
        row("2", (2023, 6, 10), "Wheat", DiseaseLabel::Healthy, 98.2),
        row("3", (2023, 6, 5), "Corn", DiseaseLabel::LeafSmut, 85.7),
    ]
}

/// Newest-first list of history rows.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    next_id: u64,
}

impl History {
    /// History pre-filled with `sample_entries()`.
    pub fn with_samples() -> Self {
        Self::from_entries(sample_entries())
    }

    pub fn empty() -> Self {
        Self::from_entries(Vec::new())
    }

    fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let next_id = entries
            .iter()
            .filter_map(|e| e.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self { entries, next_id }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `result` as the newest row and return its id.
    ///
    /// Confidence is stored rounded to one decimal place, matching what the
    /// result card showed. The oldest row is dropped past `MAX_HISTORY_ENTRIES`.
    pub fn record(&mut self, result: &PredictionResult, crop_type: &str) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;

        let entry = HistoryEntry {
            id: id.clone(),
            date: result.analyzed_at.date_naive(),
            crop_type: crop_type.to_string(),
            prediction: result.predicted,
            confidence: (result.confidence * 10.0).round() / 10.0,
        };
        self.entries.insert(0, entry);

        if self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.truncate(MAX_HISTORY_ENTRIES);
            tracing::debug!(max = MAX_HISTORY_ENTRIES, "History trimmed to limit");
        }

        tracing::info!(id = %id, prediction = %result.predicted, "Result saved to history");
        id
    }

    /// Count of rows per label, most frequent first (ties keep label order).
    pub fn label_counts(&self) -> Vec<(DiseaseLabel, usize)> {
        let mut counts: Vec<(DiseaseLabel, usize)> = DiseaseLabel::all()
            .iter()
            .map(|label| {
                let n = self.entries.iter().filter(|e| e.prediction == *label).count();
                (*label, n)
            })
            .filter(|(_, n)| *n > 0)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_samples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn result(label: DiseaseLabel, confidence: f64) -> PredictionResult {
        PredictionResult {
            predicted: label,
            confidence,
            recommendation: None,
            analyzed_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_samples_are_newest_first() {
        let history = History::with_samples();
        assert_eq!(history.len(), 3);
        let dates: Vec<_> = history.entries().iter().map(|e| e.date).collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(history.entries()[1].prediction, DiseaseLabel::Healthy);
    }

    #[test]
    fn test_record_prepends_with_fresh_id_and_rounded_confidence() {
        let mut history = History::with_samples();
        let id = history.record(&result(DiseaseLabel::Blast, 87.349), "Rice");

        assert_eq!(id, "4");
        let newest = &history.entries()[0];
        assert_eq!(newest.id, "4");
        assert_eq!(newest.prediction, DiseaseLabel::Blast);
        assert_eq!(newest.confidence, 87.3);
        assert_eq!(newest.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_record_is_bounded() {
        let mut history = History::empty();
        for _ in 0..MAX_HISTORY_ENTRIES + 5 {
            history.record(&result(DiseaseLabel::Hispa, 80.0), "Rice");
        }
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
    }

    #[test]
    fn test_label_counts() {
        let mut history = History::empty();
        history.record(&result(DiseaseLabel::Tungro, 80.0), "Rice");
        history.record(&result(DiseaseLabel::Tungro, 81.0), "Rice");
        history.record(&result(DiseaseLabel::Healthy, 90.0), "Rice");

        let counts = history.label_counts();
        assert_eq!(
            counts,
            vec![(DiseaseLabel::Tungro, 2), (DiseaseLabel::Healthy, 1)]
        );
    }
}
