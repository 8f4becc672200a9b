// MODEL: Craft, camera and world state
pub mod bounds;
pub mod camera;
pub mod control;
pub mod craft;

pub use bounds::{BoundaryVolume, WallSlab};
pub use camera::{CameraState, ZoomMode};
pub use control::{CameraControl, ControlState, FrameInput, RisingEdge};
pub use craft::CraftState;
