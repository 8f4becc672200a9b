use glam::Vec3;
use rapier3d::prelude::*;
use tracing::info;

use crate::config::{CraftConfig, RigidBodyConfig};
use crate::controller::boundary::{build_walls, WallContacts, WallMaterial};
use crate::controller::motion::MotionModel;
use crate::controller::physics::{from_rotation, from_vector, to_isometry, to_vector, PhysicsWorld};
use crate::model::{BoundaryVolume, ControlState, CraftState};

/// Motion delegated to rapier: controls become force and torque on a
/// damped dynamic body, and the world is stepped at a fixed rate.
pub struct RigidBodyModel {
    world: PhysicsWorld,
    craft: RigidBodyHandle,
    tuning: RigidBodyConfig,
    reverse_thrust_ratio: f32,
    dead_zone: f32,
}

impl RigidBodyModel {
    /// Build the world, the craft body and the six walls. The returned
    /// `WallContacts` is this model's boundary resolver.
    pub fn new(
        craft_config: &CraftConfig,
        tuning: RigidBodyConfig,
        volume: &BoundaryVolume,
        spawn: &CraftState,
    ) -> (Self, WallContacts) {
        let mut world = PhysicsWorld::new(Vec3::from_array(tuning.gravity), tuning.fixed_step, tuning.max_substeps);
        let material = WallMaterial { friction: tuning.wall_friction, restitution: tuning.wall_restitution };

        let radius = craft_config.radius.max(0.01);
        let volume_of_ball = 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3);
        let body = RigidBodyBuilder::dynamic()
            .position(to_isometry(spawn.position, spawn.orientation))
            .linvel(to_vector(spawn.velocity))
            .linear_damping(tuning.linear_damping)
            .angular_damping(tuning.angular_damping)
            .ccd_enabled(true)
            .build();
        // Same material as the walls so the combined response is the configured one.
        let collider = ColliderBuilder::ball(radius)
            .density(tuning.mass / volume_of_ball)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();
        let craft = world.insert(body, collider);

        let walls = build_walls(&mut world, volume, tuning.wall_thickness, material);
        info!(mass = tuning.mass, radius, "rigid-body craft registered");

        let model = Self {
            world,
            craft,
            tuning,
            reverse_thrust_ratio: craft_config.reverse_thrust_ratio,
            dead_zone: craft_config.dead_zone,
        };
        (model, walls)
    }

    /// Local-space force and torque for the given controls.
    fn control_wrench(&self, control: &ControlState) -> (Vec3, Vec3) {
        let thrust = control.thrust(self.reverse_thrust_ratio) * self.tuning.thrust_force;
        let force = Vec3::new(0.0, 0.0, thrust);

        let (mx, my) = control.axes(self.dead_zone);
        let yaw = -mx * self.tuning.torque_sensitivity;
        let pitch = my * self.tuning.torque_sensitivity;
        // Auto-bank: half the yaw torque about the nose axis.
        let roll = yaw * 0.5;
        (force, Vec3::new(pitch, yaw, roll))
    }

    fn sync(&self, craft: &mut CraftState) {
        let Some(body) = self.world.bodies.get(self.craft) else {
            return;
        };
        craft.position = from_vector(body.translation());
        craft.set_orientation(from_rotation(body.rotation()));
        craft.velocity = from_vector(body.linvel());
        craft.angular_velocity = from_vector(body.angvel());
    }
}

impl MotionModel for RigidBodyModel {
    fn step(&mut self, craft: &mut CraftState, control: &ControlState, dt: f32) {
        let (local_force, local_torque) = self.control_wrench(control);

        // Each frame's controls land as an impulse over that frame's `dt`,
        // so frames that run no fixed step still steer the craft.
        if let Some(body) = self.world.bodies.get_mut(self.craft) {
            let rotation = from_rotation(body.rotation());
            if local_force != Vec3::ZERO {
                body.apply_impulse(to_vector(rotation * local_force * dt), true);
            }
            if local_torque != Vec3::ZERO {
                body.apply_torque_impulse(to_vector(rotation * local_torque * dt), true);
            }
        }

        self.world.advance(dt);
        self.sync(craft);
    }

    fn reset(&mut self, craft: &CraftState) {
        if let Some(body) = self.world.bodies.get_mut(self.craft) {
            body.set_position(to_isometry(craft.position, craft.orientation), true);
            body.set_linvel(to_vector(craft.velocity), true);
            body.set_angvel(to_vector(craft.angular_velocity), true);
            body.reset_forces(true);
            body.reset_torques(true);
        }
        self.world.clear_accumulator();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::boundary::BoundaryResolver;
    use glam::Quat;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (RigidBodyModel, WallContacts, CraftState) {
        let craft = CraftState::default();
        let volume = BoundaryVolume::new(Vec3::splat(-50.0), Vec3::splat(50.0));
        let (model, walls) =
            RigidBodyModel::new(&CraftConfig::default(), RigidBodyConfig::default(), &volume, &craft);
        (model, walls, craft)
    }

    #[test]
    fn registers_one_dynamic_and_six_fixed_bodies() {
        let (model, walls, _) = setup();
        assert_eq!(model.world.bodies.len(), 7);
        assert!(model.world.bodies[model.craft].is_dynamic());
        let fixed = model.world.bodies.iter().filter(|(_, body)| body.is_fixed()).count();
        assert_eq!(fixed, 6);
        assert_eq!(walls.boundary_distance(Vec3::new(45.0, 0.0, 0.0)), 5.0);
    }

    #[test]
    fn zero_input_zero_time_is_a_no_op() {
        let (mut model, _, mut craft) = setup();
        let before = craft;
        model.step(&mut craft, &ControlState::default(), 0.0);
        assert!((craft.position - before.position).length() < 1e-6);
        assert!(craft.velocity.length() < 1e-6);
    }

    #[test]
    fn forward_thrust_moves_along_nose() {
        let (mut model, _, mut craft) = setup();
        let forward = ControlState { forward: true, ..Default::default() };
        for _ in 0..30 {
            model.step(&mut craft, &forward, DT);
        }
        assert!(craft.velocity.z > 0.0);
        assert!(craft.position.z > 0.0);
        assert!(craft.velocity.x.abs() < 1e-3);
    }

    #[test]
    fn reverse_thrust_is_weaker() {
        let (model, _, _) = setup();
        let (fwd, _) = model.control_wrench(&ControlState { forward: true, ..Default::default() });
        let (back, _) = model.control_wrench(&ControlState { backward: true, ..Default::default() });
        assert!(back.z < 0.0);
        assert!((back.z.abs() - fwd.z * 0.5).abs() < 1e-6);
        let (both, _) = model.control_wrench(&ControlState { forward: true, backward: true, ..Default::default() });
        assert!((both.z - (fwd.z + back.z)).abs() < 1e-6);
    }

    #[test]
    fn turn_input_banks_at_half_yaw_torque() {
        let (model, _, _) = setup();
        let (_, torque) = model.control_wrench(&ControlState { mouse_x: 4.0, ..Default::default() });
        assert!(torque.y < 0.0);
        assert!((torque.z - torque.y * 0.5).abs() < 1e-6);
        assert_eq!(torque.x, 0.0);
    }

    #[test]
    fn dead_zone_suppresses_torque() {
        let (model, _, _) = setup();
        let dz = CraftConfig::default().dead_zone;
        let (_, torque) = model.control_wrench(&ControlState { mouse_x: dz, mouse_y: -dz, ..Default::default() });
        assert_eq!(torque, Vec3::ZERO);
    }

    #[test]
    fn steering_survives_frames_without_a_substep() {
        let (mut model, _, mut craft) = setup();
        let turn = ControlState { mouse_x: 50.0, ..Default::default() };
        let half = DT * 0.5;
        model.step(&mut craft, &turn, half);
        model.step(&mut craft, &ControlState::default(), half);
        assert!(craft.angular_velocity.y < 0.0, "angvel {}", craft.angular_velocity);
        assert!(craft.angular_velocity.z < 0.0);
    }

    #[test]
    fn thrust_is_independent_of_refresh_rate() {
        let (mut slow, _, mut a) = setup();
        let (mut fast, _, mut b) = setup();
        let forward = ControlState { forward: true, ..Default::default() };
        for _ in 0..60 {
            slow.step(&mut a, &forward, DT);
        }
        for _ in 0..120 {
            fast.step(&mut b, &forward, DT * 0.5);
        }
        let rel = (a.speed() - b.speed()).abs() / a.speed();
        assert!(rel < 0.1, "60 Hz {} vs 120 Hz {}", a.speed(), b.speed());
    }

    #[test]
    fn damping_brings_craft_to_rest() {
        let (mut model, _, mut craft) = setup();
        let forward = ControlState { forward: true, ..Default::default() };
        for _ in 0..20 {
            model.step(&mut craft, &forward, DT);
        }
        let moving = craft.speed();
        for _ in 0..600 {
            model.step(&mut craft, &ControlState::default(), DT);
        }
        assert!(craft.speed() < moving * 0.1);
    }

    #[test]
    fn walls_keep_craft_inside() {
        let (mut model, _, mut craft) = setup();
        let forward = ControlState { forward: true, ..Default::default() };
        for _ in 0..1200 {
            model.step(&mut craft, &forward, DT);
            assert!(craft.position.z < 50.0 + 0.5);
        }
    }

    #[test]
    fn reset_teleports_body() {
        let (mut model, _, mut craft) = setup();
        craft.position = Vec3::new(10.0, -5.0, 3.0);
        craft.orientation = Quat::from_rotation_y(1.0);
        model.reset(&craft);
        let mut synced = CraftState::default();
        model.step(&mut synced, &ControlState::default(), 0.0);
        assert!((synced.position - craft.position).length() < 1e-5);
        assert!(synced.orientation.dot(craft.orientation).abs() > 1.0 - 1e-5);
    }
}
