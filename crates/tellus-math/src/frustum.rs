use crate::{Aabb3, DMat4, Plane, Point3};
use serde::{Deserialize, Serialize};
use tellus_core::Result;

/// Result of testing a bounding volume against the frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Entirely inside all six planes.
    Inside,
    /// Entirely outside at least one plane.
    Outside,
    /// Straddles one or more planes.
    Intersecting,
}

/// A view frustum as six inward-facing planes,
/// ordered: near, far, left, right, top, bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract the six planes from a view-projection matrix
    /// (Gribb–Hartmann row combinations, OpenGL clip conventions).
    ///
    /// Fails only for a degenerate matrix whose row combinations collapse.
    pub fn from_view_projection(vp: &DMat4) -> Result<Self> {
        let r0 = vp.row(0);
        let r1 = vp.row(1);
        let r2 = vp.row(2);
        let r3 = vp.row(3);

        let near = r3 + r2;
        let far = r3 - r2;
        let left = r3 + r0;
        let right = r3 - r0;
        let top = r3 - r1;
        let bottom = r3 + r1;

        Ok(Self {
            planes: [
                Plane::from_equation(near.x, near.y, near.z, near.w)?,
                Plane::from_equation(far.x, far.y, far.z, far.w)?,
                Plane::from_equation(left.x, left.y, left.z, left.w)?,
                Plane::from_equation(right.x, right.y, right.z, right.w)?,
                Plane::from_equation(top.x, top.y, top.z, top.w)?,
                Plane::from_equation(bottom.x, bottom.y, bottom.z, bottom.w)?,
            ],
        })
    }

    /// True if the point is on the inner side of all six planes.
    pub fn contains_point(&self, p: Point3) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(p) >= 0.0)
    }

    /// Classify an AABB with the p-vertex / n-vertex method: per plane, test
    /// the corner farthest along the normal (p-vertex) and the opposite
    /// corner (n-vertex). A p-vertex behind any plane means fully outside;
    /// an n-vertex behind a plane means straddling.
    pub fn classify_aabb(&self, aabb: &Aabb3) -> Containment {
        let mut all_inside = true;

        for plane in &self.planes {
            let n = plane.normal;
            let p_vertex = Point3::new(
                if n.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if n.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if n.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            let n_vertex = Point3::new(
                if n.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if n.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if n.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if plane.signed_distance(p_vertex) < 0.0 {
                return Containment::Outside;
            }
            if plane.signed_distance(n_vertex) < 0.0 {
                all_inside = false;
            }
        }

        if all_inside {
            Containment::Inside
        } else {
            Containment::Intersecting
        }
    }
}
