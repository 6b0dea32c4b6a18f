use glam::Vec3;

/// Axis-aligned bounding box accumulated over mesh positions.
///
/// Derived at load time, never stored with the geometry; recompute after any
/// change to vertices or transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that becomes valid once points are folded in.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    #[inline]
    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.max + self.min) * 0.5
    }

    #[inline]
    pub fn max_dimension(&self) -> f32 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }

    /// True when the box cannot produce a usable uniform scale: still empty,
    /// non-finite, or with no positive extent on any axis.
    pub fn is_degenerate(&self) -> bool {
        let d = self.max_dimension();
        !(d.is_finite() && d > 0.0) || !self.min.is_finite() || !self.max.is_finite()
    }
}
