use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tellus_core::{Result, TellusError, Tolerance};

/// A plane in constant-normal form: `normal . p + d = 0`.
///
/// The normal is kept unit-length so `signed_distance` is a true distance.
/// Frustum planes extracted from a view-projection matrix and geometric
/// planes share this representation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3,
    pub d: f64,
}

impl Plane {
    /// Plane through `origin` with the given (not necessarily unit) normal.
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            d: -normal.dot(origin),
        }
    }

    /// Plane from raw equation coefficients `ax + by + cz + w = 0`.
    /// Fails if the normal part is degenerate.
    pub fn from_equation(a: f64, b: f64, c: f64, w: f64) -> Result<Self> {
        let normal = Vector3::new(a, b, c);
        let len = normal.length();
        if len < Tolerance::GEOMETRIC {
            return Err(TellusError::Math("degenerate plane normal".into()));
        }
        Ok(Self {
            normal: normal / len,
            d: w / len,
        })
    }

    pub fn xy() -> Self {
        Self::new(Point3::ZERO, Vector3::Z)
    }

    pub fn xz() -> Self {
        Self::new(Point3::ZERO, Vector3::Y)
    }

    pub fn yz() -> Self {
        Self::new(Point3::ZERO, Vector3::X)
    }

    /// Signed distance from a point to this plane (positive on the normal side).
    pub fn signed_distance(&self, point: Point3) -> f64 {
        self.normal.dot(point) + self.d
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }
}
