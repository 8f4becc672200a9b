/// Craft controls for one frame. Mouse axes are raw per-frame deltas,
/// already multiplied by the user sensitivity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlState {
    pub forward: bool,
    pub backward: bool,
    pub mouse_x: f32,
    pub mouse_y: f32,
}

impl ControlState {
    /// Signed thrust, where forward is 1.0. Forward and backward both
    /// apply when held together.
    pub fn thrust(&self, reverse_ratio: f32) -> f32 {
        let mut thrust = 0.0;
        if self.forward {
            thrust += 1.0;
        }
        if self.backward {
            thrust -= reverse_ratio;
        }
        thrust
    }

    /// Mouse axes with the dead zone applied.
    pub fn axes(&self, dead_zone: f32) -> (f32, f32) {
        (apply_dead_zone(self.mouse_x, dead_zone), apply_dead_zone(self.mouse_y, dead_zone))
    }
}

/// Debug camera controls for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraControl {
    pub up: bool,
    pub down: bool,
    pub zoom_toggle: bool,
}

/// Everything the core reads from input in one frame, passed by value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub control: ControlState,
    pub camera: CameraControl,
}

/// A value whose magnitude is at or below `threshold` becomes exactly zero.
#[inline]
pub fn apply_dead_zone(value: f32, threshold: f32) -> f32 {
    if value.abs() <= threshold {
        0.0
    } else {
        value
    }
}

/// Rising-edge detector over a boolean sampled once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisingEdge {
    previous: bool,
}

impl RisingEdge {
    /// Returns true only on the frame `current` goes from false to true.
    pub fn update(&mut self, current: bool) -> bool {
        let rising = current && !self.previous;
        self.previous = current;
        rising
    }
}
