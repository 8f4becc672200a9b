use glam::{EulerRot, Quat, Vec3};

use crate::config::{CraftConfig, KinematicConfig};
use crate::model::{ControlState, CraftState};
use crate::utils::{frame_blend, frame_decay, reference_frames};

/// Advances the craft by one frame from the current controls.
pub trait MotionModel {
    fn step(&mut self, craft: &mut CraftState, control: &ControlState, dt: f32);

    /// Re-seed internal state from `craft` after it was moved externally.
    fn reset(&mut self, craft: &CraftState);
}

/// Hand-rolled integrator: eased yaw/pitch/bank, thrust along the nose,
/// exponential drag and a hard speed cap.
pub struct KinematicModel {
    tuning: KinematicConfig,
    reverse_thrust_ratio: f32,
    dead_zone: f32,
    yaw: f32,
    pitch: f32,
    roll: f32,
    target_yaw: f32,
    target_pitch: f32,
    target_roll: f32,
}

impl KinematicModel {
    pub fn new(craft: &CraftConfig, tuning: KinematicConfig) -> Self {
        Self {
            tuning,
            reverse_thrust_ratio: craft.reverse_thrust_ratio,
            dead_zone: craft.dead_zone,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            target_yaw: 0.0,
            target_pitch: 0.0,
            target_roll: 0.0,
        }
    }

    /// Current (eased) yaw, pitch and roll in radians.
    pub fn angles(&self) -> (f32, f32, f32) {
        (self.yaw, self.pitch, self.roll)
    }

    pub fn targets(&self) -> (f32, f32, f32) {
        (self.target_yaw, self.target_pitch, self.target_roll)
    }

    fn steer(&mut self, control: &ControlState, frames: f32) {
        let (mx, my) = control.axes(self.dead_zone);
        let max_pitch = self.tuning.max_pitch_deg.to_radians();

        let yaw_rate = mx * self.tuning.yaw_sensitivity;
        self.target_yaw -= yaw_rate;
        self.target_pitch = (self.target_pitch + my * self.tuning.pitch_sensitivity).clamp(-max_pitch, max_pitch);
        // Bank follows the turn input directly rather than accumulating.
        self.target_roll = -yaw_rate * self.tuning.bank_factor;

        let turn = frame_blend(self.tuning.turn_blend, frames);
        let bank = frame_blend(self.tuning.roll_blend, frames);
        self.yaw += (self.target_yaw - self.yaw) * turn;
        self.pitch += (self.target_pitch - self.pitch) * turn;
        self.roll += (self.target_roll - self.roll) * bank;
    }
}

impl MotionModel for KinematicModel {
    fn step(&mut self, craft: &mut CraftState, control: &ControlState, dt: f32) {
        let frames = reference_frames(dt);

        self.steer(control, frames);
        craft.orientation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll);
        craft.bank = self.roll;

        let mut acceleration = Vec3::ZERO;
        let forward = craft.forward();
        if control.forward {
            acceleration += forward * self.tuning.thrust_accel;
        }
        if control.backward {
            acceleration += forward * -self.tuning.thrust_accel * self.reverse_thrust_ratio;
        }

        craft.velocity = (craft.velocity + acceleration * frames) * frame_decay(self.tuning.drag, frames);

        let speed = craft.velocity.length();
        if speed > self.tuning.max_speed {
            craft.velocity *= self.tuning.max_speed / speed;
        }

        craft.position += craft.velocity * frames;
    }

    fn reset(&mut self, craft: &CraftState) {
        let (yaw, pitch, _) = craft.euler();
        let roll = craft.roll();
        self.yaw = yaw;
        self.pitch = pitch;
        self.roll = roll;
        self.target_yaw = yaw;
        self.target_pitch = pitch;
        self.target_roll = roll;
    }
}
