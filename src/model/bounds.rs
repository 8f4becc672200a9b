use glam::Vec3;

/// Axis-aligned play volume, fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryVolume {
    pub min: Vec3,
    pub max: Vec3,
}

/// One face of the volume as a thin slab lying just outside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSlab {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoundaryVolume {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Smallest distance from `p` to any of the six faces, floored at zero.
    pub fn distance_to_faces(&self, p: Vec3) -> f32 {
        let to_min = p - self.min;
        let to_max = self.max - p;
        to_min.min(to_max).min_element().max(0.0)
    }

    /// Six slabs of the given thickness whose inner surfaces coincide with
    /// the faces. Slabs overlap at the edges so corners stay closed.
    pub fn wall_slabs(&self, thickness: f32) -> [WallSlab; 6] {
        let c = self.center();
        let h = self.half_extents();
        let t = thickness * 0.5;
        let span = h + Vec3::splat(thickness);

        let slab = |axis: usize, sign: f32| {
            let mut center = c;
            center[axis] += sign * (h[axis] + t);
            let mut half_extents = span;
            half_extents[axis] = t;
            WallSlab { center, half_extents }
        };

        [
            slab(0, -1.0),
            slab(0, 1.0),
            slab(1, -1.0),
            slab(1, 1.0),
            slab(2, -1.0),
            slab(2, 1.0),
        ]
    }
}
