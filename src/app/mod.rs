// CropCure - app/mod.rs
//
// Application layer: session handling, the analysis flow, routing and toasts.
// Dependencies: core layer, platform storage.
// Must NOT depend on: ui.

pub mod auth;
pub mod predict;
pub mod preview;
pub mod state;
