// CropCure - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all CropCure operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CropCureError {
    /// Image selection or validation failed.
    Selection(SelectionError),

    /// Durable storage access failed.
    Storage(StorageError),

    /// Sign-in or sign-out failed.
    Auth(AuthError),

    /// The classifier could not produce a result.
    Classify(ClassifyError),

    /// History export failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for CropCureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selection(e) => write!(f, "Image selection error: {e}"),
            Self::Storage(e) => write!(f, "Storage error: {e}"),
            Self::Auth(e) => write!(f, "Authentication error: {e}"),
            Self::Classify(e) => write!(f, "Analysis error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CropCureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Selection(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Auth(e) => Some(e),
            Self::Classify(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection errors
// ---------------------------------------------------------------------------

/// Reasons an image selection is rejected. The flow state is never changed
/// when one of these is returned.
#[derive(Debug)]
pub enum SelectionError {
    /// The file is not a JPEG or PNG image.
    InvalidFileType {
        name: String,
        detected: Option<&'static str>,
    },

    /// The file exceeds the configured upload limit.
    FileTooLarge { name: String, size: u64, max_size: u64 },

    /// The file could not be read from disk.
    Unreadable { path: PathBuf, source: io::Error },

    /// The file claims to be an image but could not be decoded.
    Decode {
        name: String,
        source: image::ImageError,
    },

    /// A new image cannot be chosen while an analysis is running.
    AnalysisInProgress,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileType { name, detected } => match detected {
                Some(mime) => write!(
                    f,
                    "'{name}' is {mime}; please select an image file (JPEG, PNG)"
                ),
                None => write!(
                    f,
                    "'{name}' is not an image; please select an image file (JPEG, PNG)"
                ),
            },
            Self::FileTooLarge {
                name,
                size,
                max_size,
            } => write!(
                f,
                "'{name}' is {size} bytes, exceeds maximum of {max_size} bytes"
            ),
            Self::Unreadable { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::Decode { name, source } => {
                write!(f, "'{name}' could not be decoded: {source}")
            }
            Self::AnalysisInProgress => {
                write!(f, "An analysis is in progress; wait for it to finish")
            }
        }
    }
}

impl std::error::Error for SelectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SelectionError> for CropCureError {
    fn from(e: SelectionError) -> Self {
        Self::Selection(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from the durable key-value store.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error on the backing file.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// A stored entry is larger than any value this application writes.
    EntryTooLarge { key: String, size: u64, max_size: u64 },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "Storage I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::EntryTooLarge {
                key,
                size,
                max_size,
            } => write!(
                f,
                "Stored entry '{key}' is {size} bytes, exceeds maximum of {max_size} bytes"
            ),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StorageError> for CropCureError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Auth errors
// ---------------------------------------------------------------------------

/// Errors from sign-in / sign-out.
#[derive(Debug)]
pub enum AuthError {
    /// The identity provider rejected or failed the request.
    Provider {
        operation: &'static str,
        reason: String,
    },

    /// The session record could not be serialised.
    Serialize { source: serde_json::Error },

    /// The session record could not be written to or removed from storage.
    Storage(StorageError),

    /// The provider worker exited without reporting a result.
    WorkerLost { operation: &'static str },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider { operation, reason } => {
                write!(f, "{operation} failed: {reason}")
            }
            Self::Serialize { source } => {
                write!(f, "Failed to serialise session: {source}")
            }
            Self::Storage(e) => write!(f, "{e}"),
            Self::WorkerLost { operation } => {
                write!(f, "{operation} did not complete")
            }
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize { source } => Some(source),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<AuthError> for CropCureError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

// ---------------------------------------------------------------------------
// Classifier errors
// ---------------------------------------------------------------------------

/// Errors a classifier backend may report.
#[derive(Debug)]
pub enum ClassifyError {
    /// The image could not be used as model input.
    InvalidInput { reason: String },

    /// The backend is not available (model not loaded, worker gone, ...).
    Unavailable { reason: String },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { reason } => write!(f, "Invalid classifier input: {reason}"),
            Self::Unavailable { reason } => write!(f, "Classifier unavailable: {reason}"),
        }
    }
}

impl std::error::Error for ClassifyError {}

impl From<ClassifyError> for CropCureError {
    fn from(e: ClassifyError) -> Self {
        Self::Classify(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to history export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for CropCureError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CropCureError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for CropCure results.
pub type Result<T> = std::result::Result<T, CropCureError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_selection_error_message_names_accepted_types() {
        let err = SelectionError::InvalidFileType {
            name: "notes.txt".to_string(),
            detected: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains("JPEG, PNG"));
    }

    #[test]
    fn test_top_level_error_preserves_source_chain() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: CropCureError = AuthError::from(StorageError::Io {
            path: PathBuf::from("/tmp/x.json"),
            operation: "write",
            source: io,
        })
        .into();

        let auth = err.source().expect("auth layer");
        let storage = auth.source().expect("storage layer");
        assert!(storage.source().is_some(), "io error must be reachable");
    }
}
