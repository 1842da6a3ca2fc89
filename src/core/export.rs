// CropCure - core/export.rs
//
// CSV and JSON export of prediction history.
// Core layer: writes to any Write trait object.

use crate::core::model::HistoryEntry;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export file formats offered by the History screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

/// Export entries to CSV format.
///
/// Writes: id, date, crop_type, prediction, confidence
pub fn export_csv<W: Write>(
    entries: &[HistoryEntry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["id", "date", "crop_type", "prediction", "confidence"])
        .map_err(csv_err)?;

    for entry in entries {
        let date = entry.date.format("%Y-%m-%d").to_string();
        let confidence = format!("{:.1}", entry.confidence);
        csv_writer
            .write_record([
                entry.id.as_str(),
                date.as_str(),
                entry.crop_type.as_str(),
                entry.prediction.label(),
                confidence.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(entries.len())
}

/// Export entries to JSON format (array of objects).
pub fn export_json<W: Write>(
    entries: &[HistoryEntry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, entries).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.len())
}

/// Write `entries` in `format`.
pub fn export<W: Write>(
    format: ExportFormat,
    entries: &[HistoryEntry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Csv => export_csv(entries, writer, export_path),
        ExportFormat::Json => export_json(entries, writer, export_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::sample_entries;

    #[test]
    fn test_csv_export() {
        let entries = sample_entries();
        let mut buf = Vec::new();
        let count = export_csv(&entries, &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 3);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("id,date,crop_type,prediction,confidence"));
        assert_eq!(
            lines.next(),
            Some("1,2023-06-15,Rice,Bacterial Leaf Blight,92.5")
        );
    }

    #[test]
    fn test_json_export() {
        let entries = sample_entries();
        let mut buf = Vec::new();
        let count = export(ExportFormat::Json, &entries, &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 3);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[1]["prediction"], "Healthy");
        assert_eq!(value[1]["date"], "2023-06-10");
        assert_eq!(value[2]["crop_type"], "Corn");
    }
}
