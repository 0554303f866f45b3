//! Axis-aligned bounding boxes

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box in world or local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing all points, `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::new(first, first);
        for point in points {
            aabb.expand_to(point);
        }
        Some(aabb)
    }

    /// Grow the box so it contains `point`
    pub fn expand_to(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Axis-aligned box enclosing this box after applying `matrix`.
    ///
    /// Rotations grow the result; it encloses every transformed corner.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let corners = self
            .corners()
            .map(|corner| matrix.transform_point(&Point3::from(corner)).coords);
        let mut aabb = AABB::new(corners[0], corners[0]);
        for corner in &corners[1..] {
            aabb.expand_to(*corner);
        }
        aabb
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB.
    ///
    /// Touching faces count as overlap.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;

    fn cube(min: f32, max: f32) -> AABB {
        AABB::new(Vec3::new(min, min, min), Vec3::new(max, max, max))
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = cube(-1.0, 1.0);

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = cube(0.0, 2.0);
        let aabb2 = cube(1.0, 3.0);
        let aabb3 = cube(5.0, 7.0);

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
    }

    #[test]
    fn test_touching_faces_intersect() {
        assert!(cube(0.0, 1.0).intersects(&cube(1.0, 2.0)));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        let a = cube(0.0, 1.0);
        let b = AABB::new(Vec3::new(0.0, 0.0, 1.5), Vec3::new(1.0, 1.0, 2.0));
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_from_points_and_union() {
        assert!(AABB::from_points(std::iter::empty()).is_none());

        let aabb = AABB::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
        ])
        .unwrap();
        assert_eq!(aabb, AABB::new(Vec3::new(-1.0, -2.0, 0.0), Vec3::new(1.0, 3.0, 0.5)));

        let merged = aabb.union(&cube(2.0, 4.0));
        assert_eq!(merged, AABB::new(Vec3::new(-1.0, -2.0, 0.0), Vec3::new(4.0, 4.0, 4.0)));
    }

    #[test]
    fn test_transformed_rotation_grows_box() {
        let slab = AABB::new(Vec3::new(-2.0, -0.5, -0.5), Vec3::new(2.0, 0.5, 0.5));
        let matrix = Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation_degrees(Vec3::new(0.0, 90.0, 0.0))
            .to_matrix();

        let world = slab.transformed(&matrix);
        assert_relative_eq!(world.min, Vec3::new(9.5, -0.5, -2.0), epsilon = 1e-5);
        assert_relative_eq!(world.max, Vec3::new(10.5, 0.5, 2.0), epsilon = 1e-5);
    }
}
