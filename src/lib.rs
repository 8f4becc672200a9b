// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod logging;
pub mod utils;

// MVC Architecture
pub mod model;
pub mod controller;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, FlightConfig, ModelKind};
pub use controller::{FlightSim, FrameSnapshot};
pub use model::{CameraControl, ControlState, FrameInput};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    logging::init();
}
