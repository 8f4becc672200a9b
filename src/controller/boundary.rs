use glam::Vec3;
use rapier3d::prelude::*;
use tracing::{debug, info};

use crate::controller::physics::{to_vector, PhysicsWorld};
use crate::model::{BoundaryVolume, CraftState};

/// Keeps the craft inside the play volume after the motion step.
pub trait BoundaryResolver {
    /// Correct `craft` in place. Returns true if anything was changed.
    fn resolve(&mut self, craft: &mut CraftState) -> bool;

    /// Distance from `position` to the nearest face, floored at zero.
    fn boundary_distance(&self, position: Vec3) -> f32;
}

/// Per-axis clamp with a damped bounce, for the kinematic model.
pub struct ClampResolver {
    volume: BoundaryVolume,
    radius: f32,
    bounce_damping: f32,
}

impl ClampResolver {
    pub fn new(volume: BoundaryVolume, radius: f32, bounce_damping: f32) -> Self {
        Self { volume, radius, bounce_damping }
    }
}

impl BoundaryResolver for ClampResolver {
    fn resolve(&mut self, craft: &mut CraftState) -> bool {
        let mut hit = false;

        for axis in 0..3 {
            let lo = self.volume.min[axis] + self.radius;
            let hi = self.volume.max[axis] - self.radius;

            if craft.position[axis] < lo {
                craft.position[axis] = lo;
                craft.velocity[axis] = craft.velocity[axis].max(0.0);
                hit = true;
            } else if craft.position[axis] > hi {
                craft.position[axis] = hi;
                craft.velocity[axis] = craft.velocity[axis].min(0.0);
                hit = true;
            }
        }

        // Damp once no matter how many faces were touched.
        if hit {
            craft.velocity *= self.bounce_damping;
            debug!(position = %craft.position, "boundary contact");
        }
        hit
    }

    fn boundary_distance(&self, position: Vec3) -> f32 {
        self.volume.distance_to_faces(position)
    }
}

/// Rigid-body boundary: the walls are static colliders, so contact is
/// resolved inside the physics step and there is nothing to do per frame.
pub struct WallContacts {
    volume: BoundaryVolume,
    walls: [RigidBodyHandle; 6],
}

impl BoundaryResolver for WallContacts {
    fn resolve(&mut self, _craft: &mut CraftState) -> bool {
        false
    }

    fn boundary_distance(&self, position: Vec3) -> f32 {
        self.volume.distance_to_faces(position)
    }
}

/// Surface response shared by the walls and the craft collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallMaterial {
    pub friction: f32,
    pub restitution: f32,
}

/// Register six fixed slabs on the faces of `volume`.
pub fn build_walls(
    world: &mut PhysicsWorld,
    volume: &BoundaryVolume,
    thickness: f32,
    material: WallMaterial,
) -> WallContacts {
    let walls = volume.wall_slabs(thickness).map(|slab| {
        let body = RigidBodyBuilder::fixed().translation(to_vector(slab.center)).build();
        let h = slab.half_extents;
        let collider = ColliderBuilder::cuboid(h.x, h.y, h.z)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();
        world.insert(body, collider)
    });
    info!(?material, thickness, "boundary walls registered");
    WallContacts { volume: *volume, walls }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 2.0;
    const BOUNCE: f32 = 0.3;

    fn resolver() -> ClampResolver {
        ClampResolver::new(BoundaryVolume::new(Vec3::splat(-100.0), Vec3::splat(100.0)), RADIUS, BOUNCE)
    }

    fn craft_at(position: Vec3, velocity: Vec3) -> CraftState {
        let mut craft = CraftState::new(position);
        craft.velocity = velocity;
        craft
    }

    #[test]
    fn inside_is_untouched() {
        let mut r = resolver();
        for p in [Vec3::ZERO, Vec3::new(97.9, -97.9, 50.0), Vec3::new(-10.0, 30.0, 97.5)] {
            let mut craft = craft_at(p, Vec3::new(1.0, -2.0, 3.0));
            let before = craft;
            assert!(!r.resolve(&mut craft));
            assert_eq!(craft, before);
        }
    }

    #[test]
    fn max_face_clamps_and_damps() {
        let mut r = resolver();
        let mut craft = craft_at(Vec3::new(100.0, 5.0, 0.0), Vec3::new(4.0, 1.0, -2.0));
        assert!(r.resolve(&mut craft));
        assert_eq!(craft.position.x, 100.0 - RADIUS);
        assert_eq!(craft.position.y, 5.0);
        assert!(craft.velocity.x <= 0.0);
        assert!((craft.velocity.y - 1.0 * BOUNCE).abs() < 1e-6);
        assert!((craft.velocity.z + 2.0 * BOUNCE).abs() < 1e-6);
    }

    #[test]
    fn min_face_keeps_inward_velocity() {
        let mut r = resolver();
        let mut craft = craft_at(Vec3::new(0.0, -150.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
        r.resolve(&mut craft);
        assert_eq!(craft.position.y, -100.0 + RADIUS);
        // Already moving inward: kept, then damped.
        assert!((craft.velocity.y - 3.0 * BOUNCE).abs() < 1e-6);

        let mut outward = craft_at(Vec3::new(0.0, -99.0, 0.0), Vec3::new(0.0, -3.0, 0.0));
        r.resolve(&mut outward);
        assert_eq!(outward.velocity.y, 0.0);
    }

    #[test]
    fn corner_hit_damps_once() {
        let mut r = resolver();
        let mut craft = craft_at(Vec3::new(120.0, -120.0, 0.0), Vec3::new(5.0, -5.0, 10.0));
        r.resolve(&mut craft);
        assert_eq!(craft.position.x, 100.0 - RADIUS);
        assert_eq!(craft.position.y, -100.0 + RADIUS);
        assert_eq!(craft.velocity.x, 0.0);
        assert_eq!(craft.velocity.y, 0.0);
        assert!((craft.velocity.z - 10.0 * BOUNCE).abs() < 1e-6);
    }

    #[test]
    fn every_face_resolves_onto_its_plane() {
        let mut r = resolver();
        for axis in 0..3 {
            for sign in [-1.0f32, 1.0] {
                let mut p = Vec3::ZERO;
                p[axis] = sign * 100.0;
                let mut v = Vec3::ZERO;
                v[axis] = sign * 7.0;
                let mut craft = craft_at(p, v);
                r.resolve(&mut craft);
                assert_eq!(craft.position[axis], sign * (100.0 - RADIUS));
                assert!(craft.velocity[axis] * sign <= 0.0);
            }
        }
    }

    #[test]
    fn distance_query_reaches_zero_at_face() {
        let r = resolver();
        assert_eq!(r.boundary_distance(Vec3::new(100.0, 0.0, 0.0)), 0.0);
        assert_eq!(r.boundary_distance(Vec3::new(0.0, 0.0, 85.0)), 15.0);
    }

    #[test]
    fn walls_register_six_fixed_bodies() {
        let mut world = PhysicsWorld::new(Vec3::ZERO, 1.0 / 60.0, 3);
        let volume = BoundaryVolume::new(Vec3::splat(-10.0), Vec3::splat(10.0));
        let material = WallMaterial { friction: 0.3, restitution: 0.3 };
        let mut contacts = build_walls(&mut world, &volume, 1.0, material);
        assert_eq!(world.bodies.len(), 6);
        assert_eq!(world.colliders.len(), 6);
        for handle in contacts.walls {
            assert!(world.bodies[handle].is_fixed());
        }
        let mut craft = CraftState::new(Vec3::new(50.0, 0.0, 0.0));
        assert!(!contacts.resolve(&mut craft));
        assert_eq!(craft.position.x, 50.0);
        assert_eq!(contacts.boundary_distance(Vec3::new(0.0, 7.0, 0.0)), 3.0);
    }
}
