//! Flight tuning, loaded from RON.
//!
//! Every section carries `#[serde(default)]`, so a config file only needs
//! the values it wants to override. `FlightConfig::validate` rejects
//! tunings that would break the simulation invariants (a drag factor
//! above one, a craft wider than the play volume, and so on).
use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::controller::input::KeyBindings;
use crate::model::{BoundaryVolume, ZoomMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }
}

/// Which motion strategy drives the craft for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelKind {
    #[default]
    Kinematic,
    RigidBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub model: ModelKind,
    pub craft: CraftConfig,
    pub kinematic: KinematicConfig,
    pub rigid_body: RigidBodyConfig,
    pub boundary: BoundaryConfig,
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub frame: FrameConfig,
}

/// Settings shared by both motion models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    pub spawn: [f32; 3],
    /// Collision radius used against the boundary.
    pub radius: f32,
    /// Reverse thrust as a fraction of forward thrust.
    pub reverse_thrust_ratio: f32,
    /// Mouse-axis magnitudes at or below this are treated as zero.
    pub dead_zone: f32,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            spawn: [0.0, 0.0, 0.0],
            radius: 2.0,
            reverse_thrust_ratio: 0.5,
            dead_zone: 0.1,
        }
    }
}

impl CraftConfig {
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.spawn)
    }
}

/// Closed-form integrator tuning. Rates are per 60 Hz reference frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicConfig {
    pub yaw_sensitivity: f32,
    pub pitch_sensitivity: f32,
    pub max_pitch_deg: f32,
    pub bank_factor: f32,
    pub turn_blend: f32,
    pub roll_blend: f32,
    pub thrust_accel: f32,
    /// Velocity multiplier applied once per reference frame.
    pub drag: f32,
    pub max_speed: f32,
}

impl Default for KinematicConfig {
    fn default() -> Self {
        Self {
            yaw_sensitivity: 0.002,
            pitch_sensitivity: 0.002,
            max_pitch_deg: 90.0,
            bank_factor: 20.0,
            turn_blend: 0.1,
            roll_blend: 0.05,
            thrust_accel: 0.05,
            drag: 0.98,
            max_speed: 2.0,
        }
    }
}

/// Rigid-body tuning. Forces and damping are in engine units (per second).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBodyConfig {
    pub mass: f32,
    pub thrust_force: f32,
    pub torque_sensitivity: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity: [f32; 3],
    pub fixed_step: f32,
    pub max_substeps: u32,
    pub wall_thickness: f32,
    pub wall_friction: f32,
    pub wall_restitution: f32,
}

impl Default for RigidBodyConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            thrust_force: 40.0,
            torque_sensitivity: 0.5,
            linear_damping: 0.5,
            angular_damping: 0.9,
            gravity: [0.0, 0.0, 0.0],
            fixed_step: 1.0 / 60.0,
            max_substeps: 3,
            wall_thickness: 1.0,
            wall_friction: 0.3,
            wall_restitution: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
    /// Velocity multiplier applied once when any axis is clamped.
    pub bounce_damping: f32,
    pub warning_distance: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            min: [-500.0, -500.0, -500.0],
            max: [500.0, 500.0, 500.0],
            bounce_damping: 0.3,
            warning_distance: 20.0,
        }
    }
}

impl BoundaryConfig {
    pub fn volume(&self) -> BoundaryVolume {
        BoundaryVolume::new(Vec3::from_array(self.min), Vec3::from_array(self.max))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraSmoothing {
    Lerp { blend: f32 },
    Spring { stiffness: f32, damping: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetFrame {
    /// Offset is rotated by the craft orientation.
    CraftLocal,
    /// Offset is applied along world axes.
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AimMode {
    Craft,
    LookAhead { factor: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub height: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Height change per reference frame while a debug key is held.
    pub height_rate: f32,
    pub close_distance: f32,
    pub standard_distance: f32,
    pub far_distance: f32,
    pub smoothing: CameraSmoothing,
    pub offset_frame: OffsetFrame,
    pub aim: AimMode,
    pub roll_sensitivity: f32,
    pub roll_blend: f32,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            height: 3.0,
            min_height: 0.5,
            max_height: 10.0,
            height_rate: 0.1,
            close_distance: 6.0,
            standard_distance: 10.0,
            far_distance: 16.0,
            smoothing: CameraSmoothing::Spring { stiffness: 0.1, damping: 0.8 },
            offset_frame: OffsetFrame::CraftLocal,
            aim: AimMode::LookAhead { factor: 5.0 },
            roll_sensitivity: 0.3,
            roll_blend: 0.1,
            fov_y_deg: 75.0,
            z_near: 0.1,
            z_far: 5000.0,
        }
    }
}

impl CameraConfig {
    pub fn distance(&self, zoom: ZoomMode) -> f32 {
        match zoom {
            ZoomMode::Close => self.close_distance,
            ZoomMode::Standard => self.standard_distance,
            ZoomMode::Far => self.far_distance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// User sensitivity multiplied into raw mouse deltas.
    pub mouse_sensitivity: f32,
    pub bindings: KeyBindings,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse_sensitivity: 1.0, bindings: KeyBindings::default() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound applied to the measured frame time, in seconds.
    pub max_frame_dt: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_frame_dt: 0.1 }
    }
}

impl FlightConfig {
    pub fn from_ron_str(src: &str) -> Result<Self, ConfigError> {
        let config: FlightConfig = ron::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&content)?;
        info!(path = %path.as_ref().display(), model = ?config.model, "loaded flight config");
        Ok(config)
    }

    /// Load `path`, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.as_ref().display(), error = %e, "using default flight config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.kinematic;
        if !(k.drag > 0.0 && k.drag <= 1.0) {
            return Err(ConfigError::invalid("kinematic.drag", format!("{} is outside (0, 1]", k.drag)));
        }
        if k.max_speed <= 0.0 {
            return Err(ConfigError::invalid("kinematic.max_speed", "must be positive"));
        }
        for (field, blend) in [("kinematic.turn_blend", k.turn_blend), ("kinematic.roll_blend", k.roll_blend)] {
            if !(0.0..=1.0).contains(&blend) {
                return Err(ConfigError::invalid(field, format!("{blend} is outside [0, 1]")));
            }
        }

        if self.craft.dead_zone < 0.0 {
            return Err(ConfigError::invalid("craft.dead_zone", "must not be negative"));
        }
        if self.craft.radius < 0.0 {
            return Err(ConfigError::invalid("craft.radius", "must not be negative"));
        }

        let b = &self.boundary;
        if !(0.0..=1.0).contains(&b.bounce_damping) {
            return Err(ConfigError::invalid(
                "boundary.bounce_damping",
                format!("{} is outside [0, 1]", b.bounce_damping),
            ));
        }
        let half = (Vec3::from_array(b.max) - Vec3::from_array(b.min)) * 0.5;
        if half.min_element() <= self.craft.radius {
            return Err(ConfigError::invalid(
                "boundary",
                format!("half extent {half} does not exceed craft radius {}", self.craft.radius),
            ));
        }
        if !self.volume_contains_spawn() {
            return Err(ConfigError::invalid("craft.spawn", "spawn point lies outside the boundary"));
        }

        let r = &self.rigid_body;
        if r.fixed_step <= 0.0 {
            return Err(ConfigError::invalid("rigid_body.fixed_step", "must be positive"));
        }
        if r.max_substeps == 0 {
            return Err(ConfigError::invalid("rigid_body.max_substeps", "must be at least 1"));
        }
        if r.mass <= 0.0 {
            return Err(ConfigError::invalid("rigid_body.mass", "must be positive"));
        }

        let c = &self.camera;
        if c.min_height > c.max_height {
            return Err(ConfigError::invalid(
                "camera.min_height",
                format!("{} is above max_height {}", c.min_height, c.max_height),
            ));
        }
        if let CameraSmoothing::Spring { damping, .. } = c.smoothing {
            if !(0.0..=1.0).contains(&damping) {
                return Err(ConfigError::invalid("camera.smoothing", "spring damping is outside [0, 1]"));
            }
        }

        if self.frame.max_frame_dt <= 0.0 {
            return Err(ConfigError::invalid("frame.max_frame_dt", "must be positive"));
        }
        Ok(())
    }

    fn volume_contains_spawn(&self) -> bool {
        self.boundary.volume().contains(self.craft.spawn_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        FlightConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = FlightConfig::from_ron_str(
            "(model: RigidBody, kinematic: (drag: 0.9), camera: (smoothing: Lerp(blend: 0.2)))",
        )
        .unwrap();
        assert_eq!(config.model, ModelKind::RigidBody);
        assert_eq!(config.kinematic.drag, 0.9);
        assert_eq!(config.kinematic.max_speed, KinematicConfig::default().max_speed);
        assert_eq!(config.camera.smoothing, CameraSmoothing::Lerp { blend: 0.2 });
        assert_eq!(config.rigid_body.max_substeps, 3);
    }

    #[test]
    fn rejects_drag_above_one() {
        let err = FlightConfig::from_ron_str("(kinematic: (drag: 1.5))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "kinematic.drag", .. }));
    }

    #[test]
    fn rejects_zero_substeps() {
        let err = FlightConfig::from_ron_str("(rigid_body: (max_substeps: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "rigid_body.max_substeps", .. }));
    }

    #[test]
    fn rejects_inverted_height_band() {
        let err = FlightConfig::from_ron_str("(camera: (min_height: 5.0, max_height: 1.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.min_height", .. }));
    }

    #[test]
    fn rejects_craft_wider_than_volume() {
        let err = FlightConfig::from_ron_str(
            "(craft: (radius: 10.0), boundary: (min: (-5.0, -5.0, -5.0), max: (5.0, 5.0, 5.0)))",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "boundary", .. }));
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = FlightConfig::from_ron_str("(model: Hover)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = FlightConfig::load_or_default("does/not/exist.ron");
        assert_eq!(config.model, ModelKind::Kinematic);
    }
}
