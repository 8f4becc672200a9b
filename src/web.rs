//! Browser entry points. The page owns the render loop and calls `tick`
//! from `requestAnimationFrame`; input events are forwarded as they arrive.
use wasm_bindgen::prelude::*;

use crate::config::FlightConfig;
use crate::controller::{FlightSim, FrameSnapshot, InputEvent, InputState};

/// Measures frame time from `performance.now()`.
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Seconds since the previous call; zero on the first call.
    pub fn tick(&mut self) -> f32 {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        let dt = match self.last_ms {
            Some(last) => ((now - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now);
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
pub struct WasmFlightSim {
    sim: FlightSim,
    input: InputState,
    clock: FrameClock,
    last: FrameSnapshot,
}

#[wasm_bindgen]
impl WasmFlightSim {
    /// Build from an optional RON config string.
    #[wasm_bindgen(constructor)]
    pub fn new(config_ron: Option<String>) -> Result<WasmFlightSim, JsValue> {
        let config = match config_ron {
            Some(src) => FlightConfig::from_ron_str(&src).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => FlightConfig::default(),
        };
        let input = InputState::new(config.input.bindings.clone(), config.input.mouse_sensitivity);
        let sim = FlightSim::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let last = sim.snapshot();
        Ok(Self { sim, input, clock: FrameClock::new(), last })
    }

    pub fn key(&mut self, key: String, down: bool) {
        let event = if down { InputEvent::KeyDown(key) } else { InputEvent::KeyUp(key) };
        self.input.process_event(&event);
    }

    pub fn mouse_move(&mut self, dx: f32, dy: f32) {
        self.input.process_event(&InputEvent::MouseMove { dx, dy });
    }

    pub fn pointer_lock(&mut self, locked: bool) {
        self.input.process_event(&InputEvent::PointerLockChanged { locked });
    }

    pub fn focus_lost(&mut self) {
        self.input.process_event(&InputEvent::FocusLost);
    }

    /// Forward `visibilitychange`; hiding the page releases held keys.
    pub fn visibility(&mut self, visible: bool) {
        self.input.process_event(&InputEvent::VisibilityChanged { visible });
    }

    /// Run one frame using measured time and the input gathered since the last tick.
    pub fn tick(&mut self) {
        let dt = self.clock.tick();
        let input = self.input.snapshot();
        self.last = self.sim.frame(dt, input);
    }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.last = self.sim.snapshot();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.sim.camera_mut().state.set_aspect(width, height);
    }

    pub fn craft_position(&self) -> Vec<f32> {
        self.last.craft_position.to_array().to_vec()
    }

    pub fn craft_orientation(&self) -> Vec<f32> {
        self.last.craft_orientation.to_array().to_vec()
    }

    pub fn speed(&self) -> f32 {
        self.last.speed
    }

    pub fn camera_position(&self) -> Vec<f32> {
        self.last.camera_position.to_array().to_vec()
    }

    pub fn camera_orientation(&self) -> Vec<f32> {
        self.last.camera_orientation.to_array().to_vec()
    }

    pub fn view_proj(&self) -> Vec<f32> {
        self.sim.camera().state.view_proj().to_cols_array().to_vec()
    }

    pub fn zoom(&self) -> u8 {
        self.last.zoom.index()
    }

    pub fn boundary_distance(&self) -> f32 {
        self.last.boundary_distance
    }

    pub fn near_boundary(&self) -> bool {
        self.last.near_boundary
    }
}
