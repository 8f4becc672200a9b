use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;
use tracing::debug;

/// How many fixed steps to run this frame and what time is left over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubstepPlan {
    pub steps: u32,
    pub remaining: f32,
    /// Time discarded because the step cap was reached.
    pub dropped: f32,
}

/// Split `accumulator + frame_dt` into whole fixed steps, at most
/// `max_substeps` of them. Backlog past the cap is dropped, not carried.
pub fn plan_substeps(accumulator: f32, frame_dt: f32, fixed_step: f32, max_substeps: u32) -> SubstepPlan {
    let mut remaining = accumulator + frame_dt.max(0.0);
    let mut steps = 0u32;

    while remaining >= fixed_step && steps < max_substeps {
        remaining -= fixed_step;
        steps += 1;
    }

    if remaining >= fixed_step {
        SubstepPlan { steps, remaining: 0.0, dropped: remaining }
    } else {
        SubstepPlan { steps, remaining, dropped: 0.0 }
    }
}

/// Owns the rapier pipeline and body sets, stepped at a fixed rate.
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    fixed_step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3, fixed_step: f32, max_substeps: u32) -> Self {
        let params = IntegrationParameters { dt: fixed_step, ..Default::default() };
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: to_vector(gravity),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            fixed_step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Insert a body with one attached collider.
    pub fn insert(&mut self, body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Advance by `dt` in fixed steps. Returns the number of steps taken.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let plan = plan_substeps(self.accumulator, dt, self.fixed_step, self.max_substeps);
        if plan.dropped > 0.0 {
            debug!(dropped = plan.dropped, steps = plan.steps, "physics backlog dropped");
        }
        self.accumulator = plan.remaining;

        for _ in 0..plan.steps {
            self.pipeline.step(
                &self.gravity,
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
        }
        plan.steps
    }

    pub fn clear_accumulator(&mut self) {
        self.accumulator = 0.0;
    }
}

#[inline]
pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn from_rotation(r: &Rotation<Real>) -> Quat {
    let q = r.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w).normalize()
}

pub fn to_isometry(position: Vec3, orientation: Quat) -> Isometry<Real> {
    Isometry::from_parts(Translation3::new(position.x, position.y, position.z), to_rotation(orientation))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 1.0 / 60.0;

    #[test]
    fn plan_runs_whole_steps_and_keeps_remainder() {
        let plan = plan_substeps(0.0, STEP * 2.5, STEP, 3);
        assert_eq!(plan.steps, 2);
        assert!((plan.remaining - STEP * 0.5).abs() < 1e-5);
        assert_eq!(plan.dropped, 0.0);
    }

    #[test]
    fn plan_caps_steps_and_drops_backlog() {
        let plan = plan_substeps(0.0, 1.0, STEP, 3);
        assert_eq!(plan.steps, 3);
        assert_eq!(plan.remaining, 0.0);
        assert!(plan.dropped > 0.9);
    }

    #[test]
    fn plan_accumulates_short_frames() {
        let first = plan_substeps(0.0, STEP * 0.6, STEP, 3);
        assert_eq!(first.steps, 0);
        let second = plan_substeps(first.remaining, STEP * 0.6, STEP, 3);
        assert_eq!(second.steps, 1);
    }

    #[test]
    fn zero_dt_runs_nothing() {
        assert_eq!(plan_substeps(0.0, 0.0, STEP, 3).steps, 0);
    }

    #[test]
    fn rotation_conversion_round_trips() {
        let q = Quat::from_euler(glam::EulerRot::YXZ, 0.3, -0.7, 1.1);
        let back = from_rotation(&to_rotation(q));
        assert!(q.dot(back).abs() > 1.0 - 1e-6);
        let v = Vec3::new(1.0, 2.0, 3.0);
        let rotated = from_vector(&(to_rotation(q) * to_vector(v)));
        assert!((rotated - q * v).length() < 1e-5);
    }

    #[test]
    fn free_body_drifts_under_velocity() {
        let mut world = PhysicsWorld::new(Vec3::ZERO, STEP, 3);
        let body = RigidBodyBuilder::dynamic().linvel(vector![0.0, 0.0, 6.0]).build();
        let handle = world.insert(body, ColliderBuilder::ball(0.5).build());
        let steps = world.advance(STEP * 3.0 + 1e-4);
        assert_eq!(steps, 3);
        let z = world.bodies[handle].translation().z;
        assert!((z - 0.3).abs() < 1e-3, "z = {z}");
    }
}
