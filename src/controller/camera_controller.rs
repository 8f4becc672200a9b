use glam::{Quat, Vec3};
use tracing::debug;

use crate::config::{AimMode, CameraConfig, CameraSmoothing, OffsetFrame};
use crate::model::camera::look_rotation;
use crate::model::{CameraControl, CameraState, CraftState, RisingEdge, ZoomMode};
use crate::utils::{frame_blend, frame_decay, reference_frames};

/// Chase camera that trails the craft with smoothing, look-ahead and a
/// damped share of the craft's bank.
pub struct ChaseCamera {
    pub state: CameraState,
    config: CameraConfig,
    zoom_toggle: RisingEdge,
}

impl ChaseCamera {
    /// Create the camera already settled behind `craft` at the standard zoom.
    pub fn new(config: CameraConfig, craft: &CraftState) -> Self {
        let zoom = ZoomMode::default();
        let offset = Vec3::new(
            0.0,
            config.height.clamp(config.min_height, config.max_height),
            -config.distance(zoom),
        );
        let state = CameraState::new(offset, config.fov_y_deg.to_radians(), config.z_near, config.z_far);
        let mut camera = Self { state, config, zoom_toggle: RisingEdge::default() };
        camera.snap_to(craft);
        camera
    }

    pub fn zoom(&self) -> ZoomMode {
        self.state.zoom
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn orientation(&self) -> Quat {
        self.state.orientation()
    }

    /// Place the camera at its target with no smoothing and no residual motion.
    pub fn snap_to(&mut self, craft: &CraftState) {
        self.state.position = self.target_position(craft);
        self.state.velocity = Vec3::ZERO;
        self.state.roll = craft.roll() * self.config.roll_sensitivity;
        if let Some(look) = look_rotation(self.aim_point(craft) - self.state.position, Vec3::Y) {
            self.state.look = look;
        }
    }

    /// Advance the camera one frame behind `craft`.
    pub fn update(&mut self, craft: &CraftState, control: &CameraControl, dt: f32) {
        let frames = reference_frames(dt);

        self.apply_controls(control, frames);

        let target = self.target_position(craft);
        self.smooth_towards(target, frames);

        let aim = self.aim_point(craft);
        // Keep the last good orientation when the basis is degenerate.
        if let Some(look) = look_rotation(aim - self.state.position, Vec3::Y) {
            self.state.look = look;
        }

        let target_roll = craft.roll() * self.config.roll_sensitivity;
        self.state.roll += (target_roll - self.state.roll) * frame_blend(self.config.roll_blend, frames);
    }

    fn apply_controls(&mut self, control: &CameraControl, frames: f32) {
        if self.zoom_toggle.update(control.zoom_toggle) {
            self.state.zoom = self.state.zoom.next();
            debug!(zoom = ?self.state.zoom, "camera zoom changed");
        }
        self.state.offset.z = -self.config.distance(self.state.zoom);

        let step = self.config.height_rate * frames;
        if control.up {
            self.state.offset.y += step;
        }
        if control.down {
            self.state.offset.y -= step;
        }
        self.state.offset.y = self.state.offset.y.clamp(self.config.min_height, self.config.max_height);
    }

    fn target_position(&self, craft: &CraftState) -> Vec3 {
        let offset = match self.config.offset_frame {
            OffsetFrame::CraftLocal => craft.orientation * self.state.offset,
            OffsetFrame::World => self.state.offset,
        };
        craft.position + offset
    }

    fn aim_point(&self, craft: &CraftState) -> Vec3 {
        match self.config.aim {
            AimMode::Craft => craft.position,
            AimMode::LookAhead { factor } => craft.position + craft.velocity * factor,
        }
    }

    fn smooth_towards(&mut self, target: Vec3, frames: f32) {
        let error = target - self.state.position;
        match self.config.smoothing {
            CameraSmoothing::Lerp { blend } => {
                self.state.position += error * frame_blend(blend, frames);
            }
            CameraSmoothing::Spring { stiffness, damping } => {
                self.state.velocity += error * stiffness * frames;
                self.state.velocity *= frame_decay(damping, frames);
                self.state.position += self.state.velocity * frames;
            }
        }
    }
}
