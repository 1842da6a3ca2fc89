// CropCure - app/predict.rs
//
// Image analysis flow: select → analyze → result, with reset.
//
// Architecture:
//   - `PredictFlow` lives on the UI thread; the simulated latency and the
//     classifier call run on a background thread.
//   - Each analysis gets its own channel (and a request id for logs); a
//     superseded or orphaned worker's send goes nowhere.
//   - An `Arc<AtomicBool>` cancel flag lets teardown stop the worker's sleep.
//   - The preview is a scoped resource: the old handle is dropped before a
//     new one is created, and reset/teardown drop the current one.
//
// Phase is derived from the owned data rather than stored separately, so it
// can never disagree with what is actually held.

use crate::app::preview::{PreviewHandle, PreviewTracker};
use crate::core::classifier::Classifier;
use crate::core::model::{ImageInput, PredictionResult};
use crate::core::upload;
use crate::platform::fs::{self, LimitedRead};
use crate::util::constants::ANALYSIS_CANCEL_CHECK_INTERVAL_MS;
use crate::util::error::{ClassifyError, SelectionError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Observable state of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictPhase {
    /// No image chosen.
    Idle,
    /// Image chosen and previewed, no result.
    Selected,
    /// Analysis in flight.
    Analyzing,
    /// Result available.
    Complete,
}

/// Tunables taken from the validated config.
#[derive(Debug, Clone)]
pub struct PredictSettings {
    pub analysis_delay: Duration,
    pub max_file_size_bytes: Option<u64>,
}

/// The currently selected image.
#[derive(Debug)]
pub struct UploadedImage {
    /// Path on disk, `None` for dropped/pasted bytes.
    pub source: Option<PathBuf>,
    pub input: ImageInput,
    pub size_bytes: u64,
    preview: PreviewHandle,
}

impl UploadedImage {
    pub fn name(&self) -> &str {
        &self.input.name
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Completion notices returned by `PredictFlow::poll`.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictEvent {
    Completed(PredictionResult),
    Failed { error: String },
}

#[derive(Debug)]
struct AnalysisMessage {
    request_id: u64,
    outcome: Result<PredictionResult, ClassifyError>,
}

struct AnalysisJob {
    request_id: u64,
    rx: mpsc::Receiver<AnalysisMessage>,
    cancel: Arc<AtomicBool>,
    started: Instant,
}

/// State machine for one visit to the analysis screen.
pub struct PredictFlow {
    classifier: Arc<dyn Classifier>,
    settings: PredictSettings,
    tracker: PreviewTracker,
    image: Option<UploadedImage>,
    result: Option<PredictionResult>,
    job: Option<AnalysisJob>,
    last_request_id: u64,
}

impl PredictFlow {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        settings: PredictSettings,
        tracker: PreviewTracker,
    ) -> Self {
        Self {
            classifier,
            settings,
            tracker,
            image: None,
            result: None,
            job: None,
            last_request_id: 0,
        }
    }

    pub fn phase(&self) -> PredictPhase {
        if self.job.is_some() {
            PredictPhase::Analyzing
        } else if self.image.is_none() {
            PredictPhase::Idle
        } else if self.result.is_some() {
            PredictPhase::Complete
        } else {
            PredictPhase::Selected
        }
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.job.is_some()
    }

    pub fn settings(&self) -> &PredictSettings {
        &self.settings
    }

    /// Fraction of the simulated latency elapsed, while analyzing.
    pub fn progress(&self) -> Option<f32> {
        let job = self.job.as_ref()?;
        let total = self.settings.analysis_delay.as_secs_f32();
        if total <= 0.0 {
            return Some(1.0);
        }
        Some((job.started.elapsed().as_secs_f32() / total).min(1.0))
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Select an image file from disk.
    ///
    /// On error the flow is unchanged.
    pub fn select_file(&mut self, path: &Path) -> Result<PredictPhase, SelectionError> {
        if self.is_analyzing() {
            return Err(SelectionError::AnalysisInProgress);
        }

        let name = fs::display_name(path);
        let bytes = match fs::read_with_limit(path, self.settings.max_file_size_bytes) {
            Ok(LimitedRead::Bytes(b)) => b,
            Ok(LimitedRead::TooLarge { size }) => {
                return Err(SelectionError::FileTooLarge {
                    name,
                    size,
                    max_size: self.settings.max_file_size_bytes.unwrap_or(size),
                })
            }
            Err(e) => {
                return Err(SelectionError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        self.install(name, Some(path.to_path_buf()), bytes)
    }

    /// Select an image from in-memory bytes (drag-and-drop without a path).
    pub fn select_bytes(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<PredictPhase, SelectionError> {
        if self.is_analyzing() {
            return Err(SelectionError::AnalysisInProgress);
        }
        self.install(name.to_string(), None, bytes)
    }

    fn install(
        &mut self,
        name: String,
        source: Option<PathBuf>,
        bytes: Vec<u8>,
    ) -> Result<PredictPhase, SelectionError> {
        let mime = upload::validate(&name, &bytes, self.settings.max_file_size_bytes)?;
        let pixels = upload::decode_preview(&name, &bytes, mime)?;

        // Release the old preview before the new one exists.
        self.image = None;
        self.result = None;

        let preview = self.tracker.create(pixels);
        tracing::info!(
            image = %name,
            mime = %mime,
            bytes = bytes.len(),
            preview_id = preview.id(),
            "Image selected"
        );

        self.image = Some(UploadedImage {
            source,
            size_bytes: bytes.len() as u64,
            input: ImageInput {
                name,
                mime,
                bytes: Arc::from(bytes),
            },
            preview,
        });
        Ok(self.phase())
    }

    /// Discard image, preview, and result. Refused while analyzing.
    pub fn reset(&mut self) -> bool {
        if self.is_analyzing() {
            tracing::debug!("Reset ignored: analysis in progress");
            return false;
        }
        if self.image.is_some() {
            tracing::info!("Image selection cleared");
        }
        self.image = None;
        self.result = None;
        true
    }

    // -------------------------------------------------------------------------
    // Analysis
    // -------------------------------------------------------------------------

    /// Start analyzing the selected image.
    ///
    /// Returns false (and changes nothing) with no image or while analyzing.
    pub fn analyze(&mut self) -> bool {
        if self.is_analyzing() {
            tracing::debug!("Analyze ignored: already analyzing");
            return false;
        }
        let Some(image) = self.image.as_ref() else {
            tracing::debug!("Analyze ignored: no image selected");
            return false;
        };

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        let input = image.input.clone();
        let classifier = Arc::clone(&self.classifier);
        let delay = self.settings.analysis_delay;
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker_cancel = Arc::clone(&cancel);
        std::thread::spawn(move || {
            run_analysis(request_id, input, classifier, delay, worker_cancel, tx);
        });

        self.result = None;
        self.job = Some(AnalysisJob {
            request_id,
            rx,
            cancel,
            started: Instant::now(),
        });

        tracing::info!(
            request_id,
            classifier = self.classifier.name(),
            delay_ms = delay.as_millis() as u64,
            "Analysis started"
        );
        true
    }

    /// Collect the analysis result, if ready. Non-blocking.
    pub fn poll(&mut self) -> Option<PredictEvent> {
        let job = self.job.as_ref()?;

        let message = match job.rx.try_recv() {
            Ok(m) => m,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::error!(request_id = job.request_id, "Analysis worker exited without a result");
                self.job = None;
                return Some(PredictEvent::Failed {
                    error: "The analysis stopped unexpectedly.".to_string(),
                });
            }
        };

        let elapsed = job.started.elapsed();
        self.job = None;

        match message.outcome {
            Ok(result) => {
                tracing::info!(
                    request_id = message.request_id,
                    predicted = %result.predicted,
                    confidence = result.confidence,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Analysis complete"
                );
                self.result = Some(result.clone());
                Some(PredictEvent::Completed(result))
            }
            Err(e) => {
                tracing::error!(request_id = message.request_id, error = %e, "Analysis failed");
                Some(PredictEvent::Failed {
                    error: e.to_string(),
                })
            }
        }
    }

    /// Poll until the current analysis settles or `timeout` elapses.
    ///
    /// For headless callers and tests; the GUI polls once per frame instead.
    pub fn wait_for_result(&mut self, timeout: Duration) -> Option<PredictEvent> {
        let deadline = Instant::now() + timeout;
        while self.is_analyzing() && Instant::now() < deadline {
            if let Some(event) = self.poll() {
                return Some(event);
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        None
    }
}

impl Drop for PredictFlow {
    fn drop(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel.store(true, Ordering::SeqCst);
            tracing::debug!(request_id = job.request_id, "Analysis abandoned on teardown");
        }
    }
}

impl std::fmt::Debug for PredictFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictFlow")
            .field("phase", &self.phase())
            .field("image", &self.image.as_ref().map(|i| i.name()))
            .field("result", &self.result)
            .finish()
    }
}

/// Worker body: wait out the simulated latency, then classify.
fn run_analysis(
    request_id: u64,
    input: ImageInput,
    classifier: Arc<dyn Classifier>,
    delay: Duration,
    cancel: Arc<AtomicBool>,
    tx: mpsc::Sender<AnalysisMessage>,
) {
    let deadline = Instant::now() + delay;
    let tick = Duration::from_millis(ANALYSIS_CANCEL_CHECK_INTERVAL_MS);

    loop {
        if cancel.load(Ordering::SeqCst) {
            tracing::debug!(request_id, "Analysis worker cancelled");
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(tick.min(deadline - now));
    }

    let outcome = classifier.classify(&input);
    // Receiver dropped means the flow was torn down; the result is unwanted.
    let _ = tx.send(AnalysisMessage {
        request_id,
        outcome,
    });
}
