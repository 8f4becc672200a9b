// CONTROLLER: Input, per-frame simulation systems and the frame loop
pub mod boundary;
pub mod camera_controller;
pub mod frame_loop;
pub mod input;
pub mod motion;
pub mod physics;
pub mod rigid_body;

pub use boundary::{BoundaryResolver, ClampResolver, WallContacts, WallMaterial};
pub use camera_controller::ChaseCamera;
pub use frame_loop::{CameraUniform, FlightSim, FrameSnapshot};
pub use input::{InputEvent, InputState, KeyBindings};
pub use motion::{KinematicModel, MotionModel};
pub use physics::{plan_substeps, PhysicsWorld, SubstepPlan};
pub use rigid_body::RigidBodyModel;
