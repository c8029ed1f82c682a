//! Debug/overlay objects drawn alongside the terrain.

use tellus_math::{Aabb3, DMat3, DVec3, Frustum, Point3, Sphere};
use tellus_mesh::{cuboid, icosphere, TriangleMesh};

/// Something the scene can draw: a mesh plus its world-space bounds.
pub trait Renderable {
    fn bounds(&self) -> Aabb3;

    fn mesh(&self) -> &TriangleMesh;

    fn color(&self) -> [f32; 3] {
        [0.8, 0.8, 0.8]
    }

    /// Per-frame hook; `dt` in seconds.
    fn update(&mut self, _dt: f64) {}
}

/// Solid sphere, meshed once at construction.
pub struct SphereRenderable {
    sphere: Sphere,
    color: [f32; 3],
    mesh: TriangleMesh,
}

impl SphereRenderable {
    pub fn new(sphere: Sphere, color: [f32; 3]) -> Self {
        Self::with_subdivisions(sphere, color, 3)
    }

    pub fn with_subdivisions(sphere: Sphere, color: [f32; 3], subdivisions: u32) -> Self {
        let mesh = icosphere(sphere.center, sphere.radius, subdivisions);
        Self {
            sphere,
            color,
            mesh,
        }
    }

    pub fn sphere(&self) -> Sphere {
        self.sphere
    }
}

impl Renderable for SphereRenderable {
    fn bounds(&self) -> Aabb3 {
        self.sphere.bounding_box()
    }

    fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    fn color(&self) -> [f32; 3] {
        self.color
    }
}

/// Axis-aligned box, meshed once at construction.
pub struct BoxRenderable {
    aabb: Aabb3,
    color: [f32; 3],
    mesh: TriangleMesh,
}

impl BoxRenderable {
    pub fn new(aabb: Aabb3, color: [f32; 3]) -> Self {
        let mesh = cuboid(aabb.min, aabb.max);
        Self { aabb, color, mesh }
    }
}

impl Renderable for BoxRenderable {
    fn bounds(&self) -> Aabb3 {
        self.aabb
    }

    fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    fn color(&self) -> [f32; 3] {
        self.color
    }
}

/// Visualization of a view frustum as its eight-corner hull. Handy for
/// debugging culling from a detached observer camera.
pub struct FrustumRenderable {
    color: [f32; 3],
    mesh: TriangleMesh,
}

impl FrustumRenderable {
    /// Meshes the frustum by intersecting plane triplets. A frustum whose
    /// planes fail to meet in eight proper corners (numerically degenerate
    /// projection) yields an empty mesh and a warning.
    pub fn from_frustum(frustum: &Frustum, color: [f32; 3]) -> Self {
        let mesh = match frustum_corners(frustum) {
            Some(corners) => hull_mesh(&corners),
            None => {
                log::warn!("degenerate frustum, skipping hull mesh");
                TriangleMesh::default()
            }
        };
        Self { color, mesh }
    }
}

impl Renderable for FrustumRenderable {
    fn bounds(&self) -> Aabb3 {
        self.mesh.bounding_box()
    }

    fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    fn color(&self) -> [f32; 3] {
        self.color
    }
}

/// The eight corners, ordered near/far x left/right x top/bottom.
fn frustum_corners(frustum: &Frustum) -> Option<[Point3; 8]> {
    let mut corners = [Point3::ZERO; 8];
    let mut i = 0;
    // Plane order in `Frustum`: near, far, left, right, top, bottom.
    for depth in [0, 1] {
        for side in [2, 3] {
            for vertical in [4, 5] {
                corners[i] =
                    three_plane_point(frustum, depth, side, vertical)?;
                i += 1;
            }
        }
    }
    Some(corners)
}

/// Intersection point of three planes, solving `normal . p = -d` per plane.
fn three_plane_point(frustum: &Frustum, a: usize, b: usize, c: usize) -> Option<Point3> {
    let (pa, pb, pc) = (
        &frustum.planes[a],
        &frustum.planes[b],
        &frustum.planes[c],
    );
    let m = DMat3::from_cols(pa.normal, pb.normal, pc.normal).transpose();
    if m.determinant().abs() < 1e-12 {
        return None;
    }
    Some(m.inverse() * DVec3::new(-pa.d, -pb.d, -pc.d))
}

fn hull_mesh(corners: &[Point3; 8]) -> TriangleMesh {
    let mut mesh = TriangleMesh {
        positions: corners.to_vec(),
        ..TriangleMesh::default()
    };
    let quads: [[u32; 4]; 6] = [
        [0, 1, 3, 2], // near
        [4, 6, 7, 5], // far
        [0, 4, 5, 1], // left
        [2, 3, 7, 6], // right
        [0, 2, 6, 4], // top
        [1, 5, 7, 3], // bottom
    ];
    for [a, b, c, d] in quads {
        mesh.indices.extend([a, b, c, a, c, d]);
    }
    mesh.uvs = vec![tellus_math::Point2::ZERO; 8];
    mesh.compute_normals();
    mesh
}

/// Screen-space text anchored to a world position. Resolved to pixels each
/// frame through the scene view; anchors behind the eye are not drawn.
#[derive(Debug, Clone)]
pub struct Label {
    pub position: Point3,
    pub text: String,
    pub color: [f32; 4],
}

impl Label {
    pub fn new(position: Point3, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tellus_math::DMat4;

    #[test]
    fn test_sphere_renderable_mesh_and_bounds() {
        let sphere = Sphere::new(DVec3::new(1.0, 2.0, 3.0), 2.0);
        let renderable = SphereRenderable::new(sphere, [1.0, 0.0, 0.0]);
        assert_eq!(renderable.mesh().triangle_count(), 20 * 64);
        let bounds = renderable.bounds();
        assert!(bounds.contains_point(DVec3::new(2.9, 2.0, 3.0)));
        assert!(!bounds.contains_point(DVec3::new(3.5, 2.0, 5.5)));
    }

    #[test]
    fn test_box_renderable() {
        let aabb = Aabb3::new(DVec3::ZERO, DVec3::splat(2.0));
        let renderable = BoxRenderable::new(aabb, [0.0, 1.0, 0.0]);
        assert_eq!(renderable.mesh().triangle_count(), 12);
        assert_eq!(renderable.bounds().min, aabb.min);
    }

    #[test]
    fn test_frustum_hull_encloses_interior() {
        let proj = DMat4::perspective_rh_gl(std::f64::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = DMat4::look_at_rh(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0), DVec3::Y);
        let frustum = Frustum::from_view_projection(&(proj * view)).unwrap();

        let renderable = FrustumRenderable::from_frustum(&frustum, [1.0, 1.0, 0.0]);
        assert_eq!(renderable.mesh().triangle_count(), 12);

        // A point well inside the frustum lies inside the hull bounds.
        let bounds = renderable.bounds();
        assert!(bounds.contains_point(DVec3::new(0.0, 0.0, -50.0)));
        // The camera-side of the near plane does not.
        assert!(!bounds.contains_point(DVec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_frustum_corner_solve() {
        // 90 degree FOV, aspect 1: at the far plane z = -100 the frustum is
        // 200 units wide and tall.
        let proj = DMat4::perspective_rh_gl(std::f64::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = DMat4::look_at_rh(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0), DVec3::Y);
        let frustum = Frustum::from_view_projection(&(proj * view)).unwrap();

        let corners = frustum_corners(&frustum).unwrap();
        let bounds = Aabb3::from_points(&corners).unwrap();
        assert!((bounds.min.z - -100.0).abs() < 1e-6);
        assert!((bounds.max.z - -0.1).abs() < 1e-6);
        assert!((bounds.max.x - 100.0).abs() < 1e-3);
        assert!((bounds.min.x - -100.0).abs() < 1e-3);
    }
}
