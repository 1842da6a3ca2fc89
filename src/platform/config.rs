// CropCure - platform/config.rs
//
// Platform-specific data directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for CropCure data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/cropcure/ or %APPDATA%\CropCure\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the stored session.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Simulated analysis latency in ms.
    pub delay_ms: Option<u64>,
    /// Upload size limit in bytes.
    pub max_file_size_bytes: Option<u64>,
    /// Whether the size limit is enforced at all.
    pub enforce_size_limit: Option<bool>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Analysis --
    /// Simulated latency between "Analyze" and the result.
    pub analysis_delay: Duration,
    /// Upload size limit in bytes; `None` disables the check.
    pub max_file_size_bytes: Option<u64>,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis_delay: Duration::from_millis(constants::DEFAULT_ANALYSIS_DELAY_MS),
            max_file_size_bytes: Some(constants::DEFAULT_MAX_FILE_SIZE_BYTES),
            dark_mode: false,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (AppConfig::default(), vec![format!("{err}. Using defaults.")]);
        }
    };

    let (config, warnings) = parse_config(&content, config_path);
    tracing::info!(
        path = %config_path.display(),
        warnings = warnings.len(),
        "Loaded config.toml"
    );
    (config, warnings)
}

/// Parse and validate config.toml content.
///
/// Every out-of-range field is reported; valid fields are still applied.
pub fn parse_config(content: &str, config_path: &Path) -> (AppConfig, Vec<String>) {
    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (AppConfig::default(), vec![format!("{err}. Using defaults.")]);
        }
    };

    let mut config = AppConfig::default();
    let mut problems: Vec<ConfigError> = Vec::new();

    // -- Analysis: delay_ms --
    if let Some(delay) = raw.analysis.delay_ms {
        if delay <= constants::MAX_ANALYSIS_DELAY_MS {
            config.analysis_delay = Duration::from_millis(delay);
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "[analysis] delay_ms".to_string(),
                value: delay.to_string(),
                expected: format!(
                    "0-{} (default {})",
                    constants::MAX_ANALYSIS_DELAY_MS,
                    constants::DEFAULT_ANALYSIS_DELAY_MS
                ),
            });
        }
    }

    // -- Analysis: max_file_size_bytes --
    if let Some(size) = raw.analysis.max_file_size_bytes {
        if (constants::MIN_MAX_FILE_SIZE_BYTES..=constants::ABSOLUTE_MAX_FILE_SIZE_BYTES)
            .contains(&size)
        {
            config.max_file_size_bytes = Some(size);
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "[analysis] max_file_size_bytes".to_string(),
                value: size.to_string(),
                expected: format!(
                    "{}-{} (default {})",
                    constants::MIN_MAX_FILE_SIZE_BYTES,
                    constants::ABSOLUTE_MAX_FILE_SIZE_BYTES,
                    constants::DEFAULT_MAX_FILE_SIZE_BYTES
                ),
            });
        }
    }

    // -- Analysis: enforce_size_limit --
    if raw.analysis.enforce_size_limit == Some(false) {
        config.max_file_size_bytes = None;
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => problems.push(ConfigError::ValueOutOfRange {
                field: "[ui] theme".to_string(),
                value: other.to_string(),
                expected: "\"dark\" or \"light\" (default light)".to_string(),
            }),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "[ui] font_size".to_string(),
                value: size.to_string(),
                expected: format!(
                    "{}-{} (default {})",
                    constants::MIN_FONT_SIZE,
                    constants::MAX_FONT_SIZE,
                    constants::DEFAULT_FONT_SIZE
                ),
            });
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "error, warn, info, debug, trace (default info)".to_string(),
            });
        }
    }

    if !problems.is_empty() {
        tracing::warn!(count = problems.len(), "Config validation produced warnings");
    }

    let warnings = problems
        .into_iter()
        .map(|p| format!("{p}. Using default."))
        .collect();
    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(
            config.analysis_delay,
            Duration::from_millis(constants::DEFAULT_ANALYSIS_DELAY_MS)
        );
        assert_eq!(
            config.max_file_size_bytes,
            Some(constants::DEFAULT_MAX_FILE_SIZE_BYTES)
        );
    }

    #[test]
    fn test_valid_values_are_applied() {
        let toml = r#"
            [analysis]
            delay_ms = 250
            max_file_size_bytes = 1048576

            [ui]
            theme = "Dark"
            font_size = 16.0

            [logging]
            level = "DEBUG"
        "#;
        let (config, warnings) = parse_config(toml, &path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.analysis_delay, Duration::from_millis(250));
        assert_eq!(config.max_file_size_bytes, Some(1_048_576));
        assert!(config.dark_mode);
        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back_with_warnings() {
        let toml = r#"
            [analysis]
            delay_ms = 999999
            max_file_size_bytes = 1

            [ui]
            theme = "purple"
        "#;
        let (config, warnings) = parse_config(toml, &path());
        assert_eq!(warnings.len(), 3, "warnings: {warnings:?}");
        assert_eq!(
            config.analysis_delay,
            Duration::from_millis(constants::DEFAULT_ANALYSIS_DELAY_MS)
        );
        assert_eq!(
            config.max_file_size_bytes,
            Some(constants::DEFAULT_MAX_FILE_SIZE_BYTES)
        );
        assert!(!config.dark_mode);
    }

    #[test]
    fn test_size_limit_can_be_disabled() {
        let toml = "[analysis]\nenforce_size_limit = false\n";
        let (config, warnings) = parse_config(toml, &path());
        assert!(warnings.is_empty());
        assert_eq!(config.max_file_size_bytes, None);
    }

    #[test]
    fn test_unparseable_config_uses_defaults() {
        let (config, warnings) = parse_config("[analysis\ndelay_ms = ", &path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            config.analysis_delay,
            Duration::from_millis(constants::DEFAULT_ANALYSIS_DELAY_MS)
        );
    }
}
