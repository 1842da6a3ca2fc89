// CropCure - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Session storage selection and restore
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use cropcure::app;

pub use cropcure::core;
pub use cropcure::platform;
pub use cropcure::ui;
pub use cropcure::util;

use crate::app::auth::{MockGoogleProvider, SessionHolder};
use crate::app::state::{AppState, NotificationKind, Route};
use crate::core::classifier::MockClassifier;
use crate::platform::storage::{DurableStorage, FileStorage, MemoryStorage};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Apply the configured body font size to every proportional text style.
fn configure_fonts(ctx: &egui::Context, font_size: f32) {
    ctx.style_mut(|style| {
        for (text_style, font) in style.text_styles.iter_mut() {
            match text_style {
                egui::TextStyle::Body | egui::TextStyle::Button => font.size = font_size,
                egui::TextStyle::Small => font.size = font_size * 0.75,
                egui::TextStyle::Heading => font.size = font_size * 1.6,
                egui::TextStyle::Monospace => font.size = font_size * 0.9,
                egui::TextStyle::Name(_) => {}
            }
        }
    });
}

/// CropCure - Crop disease detection assistant.
///
/// Upload a photo of a crop leaf to get a (simulated) diagnosis with
/// treatment advice, keep a history of results, and browse the disease guide.
#[derive(Parser, Debug)]
#[command(name = "CropCure", version, about)]
struct Cli {
    /// Image to load into the Predict page on start.
    image: Option<PathBuf>,

    /// Page to open on start (e.g. /predict, /history, /guide).
    #[arg(short = 'r', long = "route")]
    route: Option<String>,

    /// Directory for the stored session (overrides the platform default).
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Simulated analysis latency in milliseconds (overrides config.toml).
    #[arg(long = "analysis-delay-ms")]
    analysis_delay_ms: Option<u64>,

    /// Keep the session in memory only; nothing is written to disk.
    #[arg(long = "no-persist")]
    no_persist: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths and load config before logging so the
    // configured level can take effect.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (mut config, mut warnings) = platform::config::load_config(&platform_paths.config_file());

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "CropCure starting"
    );

    if let Some(ms) = cli.analysis_delay_ms {
        let max = util::constants::MAX_ANALYSIS_DELAY_MS;
        if ms > max {
            warnings.push(format!(
                "--analysis-delay-ms {ms} exceeds the maximum of {max}; using {max}"
            ));
        }
        config.analysis_delay = Duration::from_millis(ms.min(max));
    }

    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    // Session storage: in-memory for --no-persist, otherwise a JSON file in
    // the data directory (CLI override > platform default).
    let storage: Arc<dyn DurableStorage> = if cli.no_persist {
        tracing::info!("Session persistence disabled");
        Arc::new(MemoryStorage::new())
    } else {
        let dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| platform_paths.data_dir.clone());
        tracing::debug!(dir = %dir.display(), "Using file session storage");
        Arc::new(FileStorage::new(dir))
    };

    let mut session = SessionHolder::new(storage, Arc::new(MockGoogleProvider));
    session.restore();

    let font_size = config.font_size;
    let mut state = AppState::new(config, session, Arc::new(MockClassifier::new()), cli.debug);

    for warning in warnings {
        state.notify(NotificationKind::Info, "Configuration", warning);
    }

    // Initial page: --route wins; an image argument implies Predict.
    let initial_route = match (&cli.route, &cli.image) {
        (Some(path), _) => Route::from_path(path),
        (None, Some(_)) => Route::Predict,
        (None, None) => Route::Landing,
    };
    state.pending_image = cli.image.clone();
    state.navigate(initial_route);

    tracing::info!(
        route = initial_route.path(),
        signed_in = state.session.is_signed_in(),
        "Ready to launch GUI"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx, font_size);
            Ok(Box::new(gui::CropCureApp::new(state)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch CropCure GUI: {e}");
        std::process::exit(1);
    }
}
