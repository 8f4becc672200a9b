use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Chase distance preset. Cycles Close -> Standard -> Far -> Close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomMode {
    Close,
    #[default]
    Standard,
    Far,
}

impl ZoomMode {
    pub fn next(self) -> Self {
        match self {
            ZoomMode::Close => ZoomMode::Standard,
            ZoomMode::Standard => ZoomMode::Far,
            ZoomMode::Far => ZoomMode::Close,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            ZoomMode::Close => 0,
            ZoomMode::Standard => 1,
            ZoomMode::Far => 2,
        }
    }
}

pub struct CameraState {
    /// Offset from the craft. `z` is set by the zoom mode, `y` by the debug height.
    pub offset: Vec3,
    pub position: Vec3,
    /// Only used by spring smoothing.
    pub velocity: Vec3,
    pub roll: f32,
    /// Look-at rotation before roll is applied.
    pub look: Quat,
    pub zoom: ZoomMode,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl CameraState {
    pub fn new(offset: Vec3, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            offset,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            roll: 0.0,
            look: Quat::IDENTITY,
            zoom: ZoomMode::default(),
            fov_y,
            aspect: 16.0 / 9.0,
            z_near,
            z_far,
        }
    }

    /// World orientation: look-at rotation followed by roll about the view
    /// axis. The view axis is local -Z, so a positive roll tilts the horizon
    /// the same way as a craft rolling positively about its +Z nose.
    pub fn orientation(&self) -> Quat {
        self.look * Quat::from_axis_angle(Vec3::NEG_Z, self.roll)
    }

    /// View direction (the camera's local -Z).
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position).inverse()
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * self.view()
    }
}

/// Rotation whose local -Z points along `dir` with local +Y as close to
/// `up` as possible. `None` when `dir` is zero or parallel to `up`.
pub fn look_rotation(dir: Vec3, up: Vec3) -> Option<Quat> {
    let forward = dir.try_normalize()?;
    let right = forward.cross(up).try_normalize()?;
    let cam_up = right.cross(forward);
    let basis = glam::Mat3::from_cols(right, cam_up, -forward);
    Some(Quat::from_mat3(&basis).normalize())
}
