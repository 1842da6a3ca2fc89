// CropCure - core/mod.rs
//
// Core business logic layer.
// Dependencies: model crates only (chrono, serde, image, rand).
// Must NOT depend on: ui, platform, app.

pub mod classifier;
pub mod export;
pub mod guide;
pub mod history;
pub mod model;
pub mod upload;
