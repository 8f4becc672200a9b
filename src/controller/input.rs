/// Platform-agnostic input handling: events in, per-frame snapshots out.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{CameraControl, ControlState, FrameInput};

/// Platform-independent input events
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    MouseMove { dx: f32, dy: f32 },
    FocusLost,
    VisibilityChanged { visible: bool },
    PointerLockChanged { locked: bool },
}

/// Key mapping configuration. Keys are matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub camera_up: String,
    pub camera_down: String,
    pub zoom: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            backward: "s".to_string(),
            camera_up: "r".to_string(),
            camera_down: "f".to_string(),
            zoom: "z".to_string(),
        }
    }
}

/// Accumulates events between frames and hands the core one immutable
/// `FrameInput` per frame.
pub struct InputState {
    pressed_keys: HashSet<String>,
    look_delta: (f32, f32),
    pub pointer_locked: bool,
    bindings: KeyBindings,
    mouse_sensitivity: f32,
}

impl InputState {
    pub fn new(bindings: KeyBindings, mouse_sensitivity: f32) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            look_delta: (0.0, 0.0),
            pointer_locked: false,
            bindings,
            mouse_sensitivity,
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(key.to_ascii_lowercase());
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(&key.to_ascii_lowercase());
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::FocusLost | InputEvent::VisibilityChanged { visible: false } => {
                self.clear_keys();
            }
            InputEvent::VisibilityChanged { visible: true } => {}
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
                if !locked {
                    self.look_delta = (0.0, 0.0);
                }
            }
        }
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(&key.to_ascii_lowercase())
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    /// Take this frame's input. Mouse axes reset to neutral; key state persists.
    pub fn snapshot(&mut self) -> FrameInput {
        let (dx, dy) = std::mem::take(&mut self.look_delta);
        let b = &self.bindings;
        FrameInput {
            control: ControlState {
                forward: self.is_key_pressed(&b.forward),
                backward: self.is_key_pressed(&b.backward),
                mouse_x: dx * self.mouse_sensitivity,
                mouse_y: dy * self.mouse_sensitivity,
            },
            camera: CameraControl {
                up: self.is_key_pressed(&b.camera_up),
                down: self.is_key_pressed(&b.camera_down),
                zoom_toggle: self.is_key_pressed(&b.zoom),
            },
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default(), 1.0)
    }
}
