//! Mesh generators for the built-in renderable primitives.

use std::f64::consts::{PI, TAU};

use tellus_geometry::{base_faces, subdivide_face};
use tellus_math::{Point2, Point3, Vector3};

use crate::TriangleMesh;

/// Sphere mesh from a geodesically subdivided icosahedron.
///
/// `subdivisions` levels of 4-way splitting give `20 * 4^n` triangles.
/// Vertices are not shared across faces; normals are exact (radial).
pub fn icosphere(center: Point3, radius: f64, subdivisions: u32) -> TriangleMesh {
    let mut faces = base_faces();
    for _ in 0..subdivisions {
        let coarse = std::mem::take(&mut faces);
        for face in &coarse {
            faces.extend(subdivide_face(face));
        }
    }

    let mut mesh = TriangleMesh::default();
    for face in &faces {
        let base = mesh.positions.len() as u32;
        for &unit in face {
            mesh.positions.push(center + unit * radius);
            mesh.normals.push(unit);
            mesh.uvs.push(Point2::new(
                unit.y.atan2(unit.x) / TAU + 0.5,
                unit.z.asin() / PI + 0.5,
            ));
        }
        mesh.indices.extend([base, base + 1, base + 2]);
    }
    mesh
}

/// Axis-aligned rectangular solid between `min` and `max`, with per-face
/// normals (24 vertices, 12 triangles).
pub fn cuboid(min: Point3, max: Point3) -> TriangleMesh {
    let mut mesh = TriangleMesh::default();

    // (normal, four corners CCW viewed from outside)
    let faces: [(Vector3, [Point3; 4]); 6] = [
        (
            Vector3::X,
            [
                Point3::new(max.x, min.y, min.z),
                Point3::new(max.x, max.y, min.z),
                Point3::new(max.x, max.y, max.z),
                Point3::new(max.x, min.y, max.z),
            ],
        ),
        (
            -Vector3::X,
            [
                Point3::new(min.x, max.y, min.z),
                Point3::new(min.x, min.y, min.z),
                Point3::new(min.x, min.y, max.z),
                Point3::new(min.x, max.y, max.z),
            ],
        ),
        (
            Vector3::Y,
            [
                Point3::new(max.x, max.y, min.z),
                Point3::new(min.x, max.y, min.z),
                Point3::new(min.x, max.y, max.z),
                Point3::new(max.x, max.y, max.z),
            ],
        ),
        (
            -Vector3::Y,
            [
                Point3::new(min.x, min.y, min.z),
                Point3::new(max.x, min.y, min.z),
                Point3::new(max.x, min.y, max.z),
                Point3::new(min.x, min.y, max.z),
            ],
        ),
        (
            Vector3::Z,
            [
                Point3::new(min.x, min.y, max.z),
                Point3::new(max.x, min.y, max.z),
                Point3::new(max.x, max.y, max.z),
                Point3::new(min.x, max.y, max.z),
            ],
        ),
        (
            -Vector3::Z,
            [
                Point3::new(min.x, max.y, min.z),
                Point3::new(max.x, max.y, min.z),
                Point3::new(max.x, min.y, min.z),
                Point3::new(min.x, min.y, min.z),
            ],
        ),
    ];

    for (normal, corners) in faces {
        let base = mesh.positions.len() as u32;
        for (i, corner) in corners.into_iter().enumerate() {
            mesh.positions.push(corner);
            mesh.normals.push(normal);
            let (u, v) = match i {
                0 => (0.0, 0.0),
                1 => (1.0, 0.0),
                2 => (1.0, 1.0),
                _ => (0.0, 1.0),
            };
            mesh.uvs.push(Point2::new(u, v));
        }
        mesh.indices.extend([base, base + 1, base + 2]);
        mesh.indices.extend([base, base + 2, base + 3]);
    }
    mesh
}
