use crate::{Aabb3, Point3};
use serde::{Deserialize, Serialize};

/// A bounding sphere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Smallest sphere centered on `center` that encloses all points.
    pub fn enclosing(center: Point3, points: &[Point3]) -> Self {
        let radius = points
            .iter()
            .map(|p| (*p - center).length())
            .fold(0.0, f64::max);
        Self { center, radius }
    }

    pub fn contains_point(&self, p: Point3) -> bool {
        (p - self.center).length_squared() <= self.radius * self.radius
    }

    pub fn bounding_box(&self) -> Aabb3 {
        let r = Point3::splat(self.radius);
        Aabb3::new(self.center - r, self.center + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_enclosing() {
        let pts = vec![dvec3(1.0, 0.0, 0.0), dvec3(0.0, -2.0, 0.0), dvec3(0.0, 0.0, 0.5)];
        let sphere = Sphere::enclosing(Point3::ZERO, &pts);
        assert!((sphere.radius - 2.0).abs() < 1e-10);
        for p in pts {
            assert!(sphere.contains_point(p));
        }
    }

    #[test]
    fn test_contains_point() {
        let sphere = Sphere::new(dvec3(1.0, 0.0, 0.0), 2.0);
        assert!(sphere.contains_point(dvec3(2.5, 0.0, 0.0)));
        assert!(!sphere.contains_point(dvec3(3.5, 0.0, 0.0)));
    }
}
