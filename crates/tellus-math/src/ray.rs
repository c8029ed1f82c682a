use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tellus_core::Tolerance;

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Find the closest point on the ray to a given point.
    pub fn closest_point(&self, point: Point3) -> Point3 {
        let t = (point - self.origin).dot(self.direction).max(0.0);
        self.at(t)
    }

    /// Distance from a point to the ray.
    pub fn distance_to_point(&self, point: Point3) -> f64 {
        (point - self.closest_point(point)).length()
    }

    /// Möller–Trumbore ray/triangle intersection.
    ///
    /// Returns the distance along the ray to the hit, or `None` when the ray
    /// is parallel to the triangle plane, the hit lies outside the triangle,
    /// or the triangle is behind the origin.
    pub fn intersect_triangle(&self, v0: Point3, v1: Point3, v2: Point3) -> Option<f64> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let pvec = self.direction.cross(edge2);
        let det = edge1.dot(pvec);
        if det.abs() < Tolerance::GEOMETRIC {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = self.origin - v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = self.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        if t >= 0.0 {
            Some(t)
        } else {
            None
        }
    }
}
