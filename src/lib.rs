// reframe - Photo framing screen state with hand-off to a photo-sharing app
// Ratio and background toggles for the framing screen, and the step that passes a
// freshly saved photo to an external app

pub mod app;
pub mod cli;
pub mod controller;
pub mod error;
pub mod image_loader;
pub mod library;
pub mod modes;
pub mod observable;
pub mod presentation;
pub mod share;

pub use controller::{ControllerState, DisplayOptionsController, HandOff, Services};
pub use error::LibraryError;
pub use modes::{BackgroundMode, Color, RatioMode};
