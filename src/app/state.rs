// CropCure - app/state.rs
//
// Application state management. Holds the session, the current route, the
// analysis flow for the Predict screen, history, and toast notifications.
// Owned by the eframe::App implementation.

use crate::app::auth::{AuthEvent, AuthRequest, SessionHolder};
use crate::app::predict::{PredictEvent, PredictFlow, PredictSettings};
use crate::app::preview::PreviewTracker;
use crate::core::classifier::Classifier;
use crate::core::export::{self, ExportFormat};
use crate::core::guide::Crop;
use crate::core::history::History;
use crate::platform::config::AppConfig;
use crate::util::constants::{DEFAULT_CROP_TYPE, MAX_NOTIFICATIONS, NOTIFICATION_TTL_MS};
use crate::util::error::{CropCureError, SelectionError};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

// =============================================================================
// Routing
// =============================================================================

/// Application pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Dashboard,
    Predict,
    History,
    Guide,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Dashboard => "/dashboard",
            Route::Predict => "/predict",
            Route::History => "/history",
            Route::Guide => "/guide",
            Route::NotFound => "/404",
        }
    }

    /// Map a path to a route; unknown paths go to `NotFound`.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim();
        let normalised = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalised.to_ascii_lowercase().as_str() {
            "" | "/" => Route::Landing,
            "/dashboard" => Route::Dashboard,
            "/predict" => Route::Predict,
            "/history" => Route::History,
            "/guide" => Route::Guide,
            _ => Route::NotFound,
        }
    }

    /// Pages that need a signed-in user.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Predict | Route::History | Route::Guide
        )
    }
}

/// What the central panel shows this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Session state is not known yet.
    Loading,
    Page(Route),
}

/// Route guard.
///
/// - While the session is loading, protected pages show a spinner.
/// - Signed-out users asking for a protected page land on `Landing`.
/// - Signed-in users asking for `Landing` go to the dashboard.
pub fn resolve_route(requested: Route, loading: bool, signed_in: bool) -> Screen {
    if requested.requires_session() {
        if loading {
            Screen::Loading
        } else if signed_in {
            Screen::Page(requested)
        } else {
            Screen::Page(Route::Landing)
        }
    } else if requested == Route::Landing && signed_in {
        Screen::Page(Route::Dashboard)
    } else {
        Screen::Page(requested)
    }
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Destructive,
}

/// A transient toast.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    pub created: Instant,
}

// =============================================================================
// AppState
// =============================================================================

/// Top-level application state.
pub struct AppState {
    /// Validated configuration.
    pub config: AppConfig,

    /// Who is signed in.
    pub session: SessionHolder,

    /// Page the user asked for (before the route guard).
    pub route: Route,

    /// Analysis flow; exists only while the Predict page is open.
    pub predict: Option<PredictFlow>,

    /// Backend handed to each new analysis flow.
    pub classifier: Arc<dyn Classifier>,

    /// Counts live image previews across flows.
    pub previews: PreviewTracker,

    /// Prediction history for this run.
    pub history: History,

    /// `analyzed_at` of the last result saved to history.
    last_saved: Option<DateTime<Utc>>,

    /// Selected Guide tab.
    pub guide_tab: Crop,

    /// Visible toasts, oldest first.
    pub notifications: VecDeque<Notification>,

    /// Image passed on the command line, loaded when Predict first opens for
    /// a signed-in user.
    pub pending_image: Option<PathBuf>,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Create initial state. The session is not restored yet.
    pub fn new(
        config: AppConfig,
        session: SessionHolder,
        classifier: Arc<dyn Classifier>,
        debug_mode: bool,
    ) -> Self {
        Self {
            config,
            session,
            route: Route::Landing,
            predict: None,
            classifier,
            previews: PreviewTracker::new(),
            history: History::with_samples(),
            last_saved: None,
            guide_tab: Crop::default(),
            notifications: VecDeque::new(),
            pending_image: None,
            show_about: false,
            debug_mode,
        }
    }

    /// Guarded view of the current route.
    pub fn screen(&self) -> Screen {
        resolve_route(
            self.route,
            self.session.loading(),
            self.session.is_signed_in(),
        )
    }

    /// Switch pages. Leaving Predict tears its flow down; entering builds a
    /// fresh one.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route && (route != Route::Predict || self.predict.is_some()) {
            return;
        }
        tracing::debug!(from = self.route.path(), to = route.path(), "Navigate");

        if route != Route::Predict {
            // Dropping the flow releases its preview and abandons any analysis.
            self.predict = None;
        }
        self.route = route;

        if route == Route::Predict && self.predict.is_none() {
            self.open_predict_flow();
        }
    }

    fn open_predict_flow(&mut self) {
        let mut flow = PredictFlow::new(
            Arc::clone(&self.classifier),
            PredictSettings {
                analysis_delay: self.config.analysis_delay,
                max_file_size_bytes: self.config.max_file_size_bytes,
            },
            self.previews.clone(),
        );

        // A signed-out start is redirected away from Predict, so the pending
        // image waits for a flow that will actually be shown.
        if self.session.is_signed_in() {
            if let Some(path) = self.pending_image.take() {
                if let Err(e) = flow.select_file(&path) {
                    tracing::warn!(error = %e, "Command-line image rejected");
                    self.notify_rejection(&e);
                }
            }
        }
        self.predict = Some(flow);
    }

    // -------------------------------------------------------------------------
    // Per-frame update
    // -------------------------------------------------------------------------

    /// Drain background results, apply the route guard, and expire toasts.
    ///
    /// Returns true while something is in flight so the caller keeps
    /// repainting.
    pub fn tick(&mut self, now: Instant) -> bool {
        for event in self.session.poll() {
            self.handle_auth_event(event);
        }

        // Apply redirects so leaving a guarded page also tears it down.
        if let Screen::Page(resolved) = self.screen() {
            if resolved != self.route {
                self.navigate(resolved);
            }
        }

        if let Some(event) = self.predict.as_mut().and_then(PredictFlow::poll) {
            match event {
                PredictEvent::Completed(result) => self.notify(
                    NotificationKind::Success,
                    "Analysis complete",
                    format!("{} ({:.1}% confidence)", result.predicted, result.confidence),
                ),
                PredictEvent::Failed { error } => {
                    self.notify(NotificationKind::Destructive, "Analysis failed", error)
                }
            }
        }

        self.prune_notifications(now);

        self.session.loading()
            || self.predict.as_ref().is_some_and(PredictFlow::is_analyzing)
            || !self.notifications.is_empty()
    }

    fn handle_auth_event(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn { name } => {
                self.notify(
                    NotificationKind::Success,
                    "Signed in",
                    format!("Welcome, {name}."),
                );
                let landing = if self.pending_image.is_some() {
                    Route::Predict
                } else {
                    Route::Dashboard
                };
                self.navigate(landing);
            }
            AuthEvent::SignInFailed { error } => {
                self.notify(NotificationKind::Destructive, "Sign-in failed", error)
            }
            AuthEvent::NotRemembered { error } => self.notify(
                NotificationKind::Info,
                "Session not saved",
                format!("You will need to sign in again next time. {error}"),
            ),
            AuthEvent::SignedOut => {
                self.notify(NotificationKind::Info, "Signed out", String::new())
            }
            AuthEvent::SignOutFailed { error } => self.notify(
                NotificationKind::Destructive,
                "Sign-out incomplete",
                format!("Signed out locally. {error}"),
            ),
        }
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    pub fn sign_in(&mut self) {
        if self.session.sign_in() == AuthRequest::Ignored {
            tracing::debug!("Sign-in click ignored");
        }
    }

    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.navigate(Route::Landing);
    }

    /// Load an image from disk into the Predict flow. Rejections become a
    /// destructive toast and leave the flow unchanged.
    pub fn select_image(&mut self, path: &Path) {
        let Some(flow) = self.predict.as_mut() else {
            return;
        };
        if let Err(e) = flow.select_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Image rejected");
            self.notify_rejection(&e);
        }
    }

    /// Same as `select_image` for dropped bytes with no backing path.
    pub fn select_dropped(&mut self, name: &str, bytes: Vec<u8>) {
        let Some(flow) = self.predict.as_mut() else {
            return;
        };
        if let Err(e) = flow.select_bytes(name, bytes) {
            tracing::warn!(image = name, error = %e, "Dropped image rejected");
            self.notify_rejection(&e);
        }
    }

    fn notify_rejection(&mut self, error: &SelectionError) {
        let title = match error {
            SelectionError::AnalysisInProgress => "Analysis in progress",
            SelectionError::FileTooLarge { .. } => "File too large",
            SelectionError::Unreadable { .. } => "Cannot read file",
            SelectionError::InvalidFileType { .. } | SelectionError::Decode { .. } => {
                "Invalid file"
            }
        };
        self.notify(NotificationKind::Destructive, title, error.to_string());
    }

    /// Whether the result on the Predict page is already in the history.
    pub fn current_result_saved(&self) -> bool {
        match self.predict.as_ref().and_then(PredictFlow::result) {
            Some(result) => self.last_saved == Some(result.analyzed_at),
            None => false,
        }
    }

    /// Add the current analysis result to the history list, once.
    pub fn save_current_result(&mut self) {
        if self.current_result_saved() {
            tracing::debug!("Save ignored: result already in history");
            return;
        }
        let Some(result) = self.predict.as_ref().and_then(|f| f.result()).cloned() else {
            return;
        };
        self.history.record(&result, DEFAULT_CROP_TYPE);
        self.last_saved = Some(result.analyzed_at);
        self.notify(
            NotificationKind::Success,
            "Result saved",
            "The analysis has been saved to your history".to_string(),
        );
    }

    /// Write the history list to `path` in `format`.
    pub fn export_history(
        &self,
        path: &Path,
        format: ExportFormat,
    ) -> crate::util::error::Result<usize> {
        let file = std::fs::File::create(path).map_err(|e| CropCureError::Io {
            path: path.to_path_buf(),
            operation: "create export file",
            source: e,
        })?;
        let count = export::export(
            format,
            self.history.entries(),
            std::io::BufWriter::new(file),
            path,
        )?;
        tracing::info!(count, format = format.label(), path = %path.display(), "History exported");
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Queue a toast, dropping the oldest past `MAX_NOTIFICATIONS`.
    pub fn notify(&mut self, kind: NotificationKind, title: &str, description: String) {
        self.notifications.push_back(Notification {
            title: title.to_string(),
            description,
            kind,
            created: Instant::now(),
        });
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }

    /// Remove toasts older than `NOTIFICATION_TTL_MS`.
    pub fn prune_notifications(&mut self, now: Instant) {
        let ttl = Duration::from_millis(NOTIFICATION_TTL_MS);
        self.notifications
            .retain(|n| now.saturating_duration_since(n.created) < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::auth::MockGoogleProvider;
    use crate::core::classifier::MockClassifier;
    use crate::platform::storage::{DurableStorage, MemoryStorage};
    use tempfile::TempDir;

    const WAIT: Duration = Duration::from_secs(5);

    fn state_with(storage: Arc<dyn DurableStorage>) -> AppState {
        let session = SessionHolder::new(storage, Arc::new(MockGoogleProvider));
        let config = AppConfig {
            analysis_delay: Duration::ZERO,
            ..AppConfig::default()
        };
        AppState::new(config, session, Arc::new(MockClassifier::seeded(9)), false)
    }

    fn signed_in_state() -> AppState {
        let mut state = state_with(Arc::new(MemoryStorage::new()));
        state.session.restore();
        state.sign_in();
        for event in state.session.wait_idle(WAIT) {
            state.handle_auth_event(event);
        }
        state
    }

    #[test]
    fn test_route_paths_round_trip() {
        for route in [
            Route::Landing,
            Route::Dashboard,
            Route::Predict,
            Route::History,
            Route::Guide,
        ] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/Predict/"), Route::Predict);
        assert_eq!(Route::from_path("/settings"), Route::NotFound);
    }

    #[test]
    fn test_route_guard() {
        assert_eq!(resolve_route(Route::Predict, true, false), Screen::Loading);
        assert_eq!(
            resolve_route(Route::Predict, false, false),
            Screen::Page(Route::Landing)
        );
        assert_eq!(
            resolve_route(Route::Predict, false, true),
            Screen::Page(Route::Predict)
        );
        assert_eq!(
            resolve_route(Route::Landing, false, true),
            Screen::Page(Route::Dashboard)
        );
        assert_eq!(
            resolve_route(Route::NotFound, false, false),
            Screen::Page(Route::NotFound)
        );
    }

    #[test]
    fn test_signed_out_user_is_redirected_to_landing() {
        let mut state = state_with(Arc::new(MemoryStorage::new()));
        state.session.restore();
        state.navigate(Route::History);
        state.tick(Instant::now());
        assert_eq!(state.route, Route::Landing);
    }

    #[test]
    fn test_sign_in_lands_on_dashboard() {
        let state = signed_in_state();
        assert_eq!(state.route, Route::Dashboard);
        assert!(state
            .notifications
            .iter()
            .any(|n| n.kind == NotificationKind::Success));
    }

    #[test]
    fn test_leaving_predict_tears_flow_down() {
        let mut state = signed_in_state();
        state.navigate(Route::Predict);
        let png = {
            let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
            let mut buf = std::io::Cursor::new(Vec::new());
            img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
            buf.into_inner()
        };
        state
            .predict
            .as_mut()
            .unwrap()
            .select_bytes("leaf.png", png)
            .unwrap();
        assert_eq!(state.previews.live(), 1);

        state.navigate(Route::Guide);
        assert!(state.predict.is_none());
        assert_eq!(state.previews.live(), 0);
    }

    #[test]
    fn test_sign_out_returns_to_landing_and_drops_flow() {
        let mut state = signed_in_state();
        state.navigate(Route::Predict);
        state.sign_out();
        assert_eq!(state.route, Route::Landing);
        assert!(state.predict.is_none());
        assert!(!state.session.is_signed_in());
    }

    #[test]
    fn test_save_result_adds_history_row() {
        let mut state = signed_in_state();
        state.navigate(Route::Predict);
        let png = {
            let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
            let mut buf = std::io::Cursor::new(Vec::new());
            img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
            buf.into_inner()
        };
        let flow = state.predict.as_mut().unwrap();
        flow.select_bytes("leaf.png", png).unwrap();
        flow.analyze();
        flow.wait_for_result(WAIT);

        let before = state.history.len();
        state.save_current_result();
        assert_eq!(state.history.len(), before + 1);
    }

    #[test]
    fn test_rejected_image_raises_destructive_toast() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not an image").unwrap();

        let mut state = signed_in_state();
        state.notifications.clear();
        state.navigate(Route::Predict);
        state.select_image(&path);

        let flow = state.predict.as_ref().unwrap();
        assert_eq!(flow.phase(), crate::app::predict::PredictPhase::Idle);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].kind, NotificationKind::Destructive);
        assert_eq!(state.notifications[0].title, "Invalid file");
    }

    #[test]
    fn test_pending_image_loads_when_predict_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaf.png");
        image::DynamicImage::ImageRgb8(image::RgbImage::new(8, 8))
            .save(&path)
            .unwrap();

        let mut state = signed_in_state();
        state.pending_image = Some(path);
        state.navigate(Route::Predict);

        let flow = state.predict.as_ref().unwrap();
        assert_eq!(flow.phase(), crate::app::predict::PredictPhase::Selected);
        assert!(state.pending_image.is_none());
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::DynamicImage::ImageRgb8(image::RgbImage::new(8, 8))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_pending_image_survives_signed_out_start() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(Arc::new(MemoryStorage::new()));
        state.session.restore();
        state.pending_image = Some(write_png(dir.path(), "photo.png"));

        state.navigate(Route::Predict);
        state.tick(Instant::now());
        assert_eq!(state.route, Route::Landing);
        assert!(state.pending_image.is_some());

        state.sign_in();
        for event in state.session.wait_idle(WAIT) {
            state.handle_auth_event(event);
        }
        state.tick(Instant::now());
        state.navigate(Route::Predict);

        assert_eq!(state.route, Route::Predict);
        let flow = state.predict.as_ref().unwrap();
        assert_eq!(flow.phase(), crate::app::predict::PredictPhase::Selected);
        assert!(state.pending_image.is_none());
    }

    #[test]
    fn test_selection_during_analysis_is_reported_as_busy() {
        let dir = TempDir::new().unwrap();
        let first = write_png(dir.path(), "first.png");
        let second = write_png(dir.path(), "second.png");

        let mut state = signed_in_state();
        state.config.analysis_delay = Duration::from_secs(30);
        state.navigate(Route::Predict);
        state.select_image(&first);
        assert!(state.predict.as_mut().unwrap().analyze());
        state.notifications.clear();

        state.select_image(&second);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].title, "Analysis in progress");
        assert_eq!(state.predict.as_ref().unwrap().image().unwrap().name(), "first.png");
    }

    #[test]
    fn test_saving_same_result_twice_records_once() {
        let dir = TempDir::new().unwrap();
        let photo = write_png(dir.path(), "leaf.png");

        let mut state = signed_in_state();
        state.navigate(Route::Predict);
        state.select_image(&photo);
        let flow = state.predict.as_mut().unwrap();
        flow.analyze();
        flow.wait_for_result(WAIT);

        let before = state.history.len();
        assert!(!state.current_result_saved());
        state.save_current_result();
        assert!(state.current_result_saved());
        state.save_current_result();
        assert_eq!(state.history.len(), before + 1);

        let flow = state.predict.as_mut().unwrap();
        flow.analyze();
        flow.wait_for_result(WAIT);
        assert!(!state.current_result_saved());
        state.save_current_result();
        assert_eq!(state.history.len(), before + 2);
    }

    #[test]
    fn test_notifications_are_bounded_and_expire() {
        let mut state = state_with(Arc::new(MemoryStorage::new()));
        for i in 0..MAX_NOTIFICATIONS + 3 {
            state.notify(NotificationKind::Info, "n", i.to_string());
        }
        assert_eq!(state.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(state.notifications[0].description, "3");

        let later = Instant::now() + Duration::from_millis(NOTIFICATION_TTL_MS + 1);
        state.prune_notifications(later);
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_export_history_writes_file() {
        let dir = TempDir::new().unwrap();
        let state = state_with(Arc::new(MemoryStorage::new()));
        let path = dir.path().join("history.csv");

        let count = state.export_history(&path, ExportFormat::Csv).unwrap();
        assert_eq!(count, state.history.len());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,date,crop_type,prediction,confidence"));
    }

    #[test]
    fn test_export_to_missing_directory_fails_with_io() {
        let dir = TempDir::new().unwrap();
        let state = state_with(Arc::new(MemoryStorage::new()));
        let path = dir.path().join("missing").join("history.json");
        assert!(matches!(
            state.export_history(&path, ExportFormat::Json),
            Err(CropCureError::Io { .. })
        ));
    }
}
