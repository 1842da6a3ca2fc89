// CropCure - ui/panels/mod.rs

pub mod about;
pub mod dashboard;
pub mod guide;
pub mod history;
pub mod landing;
pub mod loading;
pub mod navbar;
pub mod not_found;
pub mod predict;
pub mod toasts;
