//! Mathematical utilities and geometric types
use glam::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Unit cube with its minimum corner at `min`.
    pub fn unit(min: Vec3) -> Self {
        Self {
            min,
            max: min + Vec3::ONE,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grows the box by `amount` on every side.
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_boundary_points() {
        let bb = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        assert!(bb.contains(Vec3::ZERO));
        assert!(bb.contains(Vec3::splat(2.0)));
        assert!(!bb.contains(Vec3::new(2.1, 0.0, 0.0)));
    }

    #[test]
    fn expand_grows_every_side() {
        let bb = Aabb::unit(Vec3::splat(5.0)).expand(1.0);
        assert_eq!(bb.min, Vec3::splat(4.0));
        assert_eq!(bb.max, Vec3::splat(7.0));
    }

    #[test]
    fn intersects_touching_boxes() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::ONE, Vec3::splat(2.0));
        let c = Aabb::new(Vec3::splat(1.5), Vec3::splat(2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
