use glam::{EulerRot, Quat, Vec3};

/// Position, orientation and velocity of the player craft.
///
/// Speed is not stored: it is always the magnitude of `velocity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftState {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    /// Only written by the rigid-body model.
    pub angular_velocity: Vec3,
    /// Bank about the nose in radians, as last published by the motion model.
    /// Kept separately because it cannot be recovered from `orientation`
    /// when the nose points straight up or down.
    pub bank: f32,
}

impl CraftState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            bank: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Local +Z rotated into world space.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Yaw, pitch and roll in radians (Y, then X, then Z).
    pub fn euler(&self) -> (f32, f32, f32) {
        self.orientation.to_euler(EulerRot::YXZ)
    }

    pub fn roll(&self) -> f32 {
        self.bank
    }

    /// Set the orientation and re-derive the bank from it, keeping the
    /// previous bank while the nose is vertical.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        if let Some(bank) = bank_angle(orientation) {
            self.bank = bank;
        }
    }
}

/// Roll of `orientation` about its own nose, measured from the world
/// horizon. Matches the Z angle of a YXZ decomposition. `None` when the
/// nose is within a hair of vertical and the horizon gives no reference.
pub fn bank_angle(orientation: Quat) -> Option<f32> {
    let right = orientation * Vec3::X;
    let up = orientation * Vec3::Y;
    if right.y.abs() + up.y.abs() < 1e-4 {
        return None;
    }
    Some(right.y.atan2(up.y))
}

impl Default for CraftState {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_follows_velocity() {
        let mut craft = CraftState::default();
        craft.velocity = Vec3::new(3.0, 0.0, 4.0);
        assert_eq!(craft.speed(), 5.0);
    }

    #[test]
    fn roll_round_trips_through_orientation() {
        let mut craft = CraftState::default();
        craft.orientation = Quat::from_euler(EulerRot::YXZ, 0.4, -0.2, 0.3);
        let (yaw, pitch, roll) = craft.euler();
        assert!((yaw - 0.4).abs() < 1e-5);
        assert!((pitch + 0.2).abs() < 1e-5);
        assert!((roll - 0.3).abs() < 1e-5);
    }

    #[test]
    fn bank_matches_euler_roll_in_level_flight() {
        let mut craft = CraftState::default();
        craft.set_orientation(Quat::from_euler(EulerRot::YXZ, -1.2, 0.6, -0.45));
        assert!((craft.roll() - craft.euler().2).abs() < 1e-5);
        assert!((craft.roll() + 0.45).abs() < 1e-5);
    }

    #[test]
    fn bank_survives_vertical_nose() {
        let mut craft = CraftState::default();
        craft.set_orientation(Quat::from_rotation_z(0.2));
        let vertical = Quat::from_euler(EulerRot::YXZ, 0.3, std::f32::consts::FRAC_PI_2, 0.25);
        assert!(bank_angle(vertical).is_none());
        craft.set_orientation(vertical);
        assert_eq!(craft.orientation, vertical);
        assert!((craft.roll() - 0.2).abs() < 1e-6);
    }
}
