// CropCure - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "CropCure";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "CropCure";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Session storage
// =============================================================================

/// Durable storage key holding the serialised signed-in user.
pub const SESSION_STORAGE_KEY: &str = "cropCureUser";

/// Extension appended to storage keys to form their file names.
pub const STORAGE_FILE_EXTENSION: &str = "json";

/// Maximum size of a stored entry we are willing to read back (bytes).
/// A session record is a few hundred bytes; anything larger is not ours.
pub const MAX_STORAGE_ENTRY_BYTES: u64 = 64 * 1024; // 64 KB

// =============================================================================
// Image upload
// =============================================================================

/// MIME types accepted by the upload flow.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// File extensions offered by the open-file dialog.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Default maximum upload size in bytes.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024; // 5 MB

/// Smallest configurable upload limit.
pub const MIN_MAX_FILE_SIZE_BYTES: u64 = 64 * 1024; // 64 KB

/// Largest configurable upload limit.
pub const ABSOLUTE_MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024; // 100 MB

/// Longest edge of the decoded preview image, in pixels.
pub const PREVIEW_MAX_DIMENSION: u32 = 512;

// =============================================================================
// Analysis
// =============================================================================

/// Simulated inference latency before a result becomes observable (ms).
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2_000;

/// Largest configurable simulated latency (ms).
pub const MAX_ANALYSIS_DELAY_MS: u64 = 60_000;

/// How often the analysis worker checks its cancel flag while sleeping (ms).
pub const ANALYSIS_CANCEL_CHECK_INTERVAL_MS: u64 = 50;

/// Lower bound (inclusive) of mock confidence, in percent.
pub const MOCK_CONFIDENCE_MIN: f64 = 70.0;

/// Upper bound (exclusive) of mock confidence, in percent.
pub const MOCK_CONFIDENCE_MAX: f64 = 100.0;

// =============================================================================
// History
// =============================================================================

/// Upper bound on in-memory history entries. Oldest entries are dropped.
pub const MAX_HISTORY_ENTRIES: usize = 500;

/// Crop type recorded for results saved from the analysis screen.
pub const DEFAULT_CROP_TYPE: &str = "Rice";

// =============================================================================
// Notifications
// =============================================================================

/// How long a toast notification stays visible (ms).
pub const NOTIFICATION_TTL_MS: u64 = 4_000;

/// Maximum number of toasts kept at once. Oldest are dropped first.
pub const MAX_NOTIFICATIONS: usize = 5;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
