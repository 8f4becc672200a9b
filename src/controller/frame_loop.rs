use glam::{Quat, Vec3};
use tracing::{info, trace};

use crate::config::{ConfigError, FlightConfig, ModelKind};
use crate::controller::boundary::{BoundaryResolver, ClampResolver};
use crate::controller::camera_controller::ChaseCamera;
use crate::controller::motion::{KinematicModel, MotionModel};
use crate::controller::rigid_body::RigidBodyModel;
use crate::model::{CraftState, FrameInput, ZoomMode};

/// Camera data handed to the renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

/// Read-only view of one finished frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub craft_position: Vec3,
    pub craft_orientation: Quat,
    pub speed: f32,
    pub camera_position: Vec3,
    pub camera_orientation: Quat,
    pub zoom: ZoomMode,
    pub boundary_distance: f32,
    pub near_boundary: bool,
}

/// Owns the craft, the camera and the chosen motion strategy, and runs
/// them in a fixed order each frame.
pub struct FlightSim {
    config: FlightConfig,
    craft: CraftState,
    motion: Box<dyn MotionModel>,
    resolver: Box<dyn BoundaryResolver>,
    camera: ChaseCamera,
    frame_index: u64,
}

impl FlightSim {
    pub fn new(config: FlightConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let volume = config.boundary.volume();
        let craft = CraftState::new(config.craft.spawn_point());

        let (motion, resolver): (Box<dyn MotionModel>, Box<dyn BoundaryResolver>) = match config.model {
            ModelKind::Kinematic => (
                Box::new(KinematicModel::new(&config.craft, config.kinematic.clone())),
                Box::new(ClampResolver::new(volume, config.craft.radius, config.boundary.bounce_damping)),
            ),
            ModelKind::RigidBody => {
                let (model, walls) = RigidBodyModel::new(&config.craft, config.rigid_body.clone(), &volume, &craft);
                (Box::new(model), Box::new(walls))
            }
        };

        let camera = ChaseCamera::new(config.camera.clone(), &craft);
        info!(model = ?config.model, min = %volume.min, max = %volume.max, "flight sim ready");

        Ok(Self { config, craft, motion, resolver, camera, frame_index: 0 })
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn craft(&self) -> &CraftState {
        &self.craft
    }

    pub fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ChaseCamera {
        &mut self.camera
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// Run one frame: motion, boundary resolution, then camera.
    ///
    /// `dt` is clamped to `[0, max_frame_dt]` before anything sees it.
    pub fn frame(&mut self, dt: f32, input: FrameInput) -> FrameSnapshot {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.config.frame.max_frame_dt) } else { 0.0 };

        self.motion.step(&mut self.craft, &input.control, dt);
        self.resolver.resolve(&mut self.craft);
        self.camera.update(&self.craft, &input.camera, dt);

        self.frame_index += 1;
        let snapshot = self.snapshot();
        trace!(
            frame = self.frame_index,
            dt,
            speed = snapshot.speed,
            position = %snapshot.craft_position,
            "frame"
        );
        snapshot
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let boundary_distance = self.resolver.boundary_distance(self.craft.position);
        FrameSnapshot {
            craft_position: self.craft.position,
            craft_orientation: self.craft.orientation,
            speed: self.craft.speed(),
            camera_position: self.camera.position(),
            camera_orientation: self.camera.orientation(),
            zoom: self.camera.zoom(),
            boundary_distance,
            near_boundary: boundary_distance < self.config.boundary.warning_distance,
        }
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        let eye = self.camera.position();
        CameraUniform {
            view_proj: self.camera.state.view_proj().to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }

    /// Put the craft back at its spawn point, at rest, and settle the camera.
    pub fn reset(&mut self) {
        self.craft = CraftState::new(self.config.craft.spawn_point());
        self.motion.reset(&self.craft);
        self.camera.snap_to(&self.craft);
        info!("craft reset to spawn");
    }
}
