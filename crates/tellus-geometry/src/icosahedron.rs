//! Icosahedral base grid for geodesic tessellation of a sphere.

use std::f64::consts::{FRAC_PI_2, TAU};

use tellus_math::Point3;

fn unit_from_lat_lon(lat: f64, lon: f64) -> Point3 {
    Point3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// The 20 triangular faces of a unit icosahedron: two polar vertices and two
/// rings of five at latitude ±atan(1/2), grouped into five columns of four
/// faces (top, two middle, bottom).
pub fn base_faces() -> Vec<[Point3; 3]> {
    let upper_lat = 0.5f64.atan();
    let lower_lat = -upper_lat;

    let mut faces = Vec::with_capacity(20);
    for i in 0..5 {
        let upper_lon1 = i as f64 / 5.0 * TAU;
        let upper_lon2 = (i + 1) as f64 / 5.0 * TAU;
        let lower_lon1 = (i as f64 + 0.5) / 5.0 * TAU;
        let lower_lon2 = (i as f64 + 1.5) / 5.0 * TAU;

        faces.push([
            unit_from_lat_lon(FRAC_PI_2, 0.0),
            unit_from_lat_lon(upper_lat, upper_lon1),
            unit_from_lat_lon(upper_lat, upper_lon2),
        ]);
        faces.push([
            unit_from_lat_lon(upper_lat, upper_lon1),
            unit_from_lat_lon(lower_lat, lower_lon1),
            unit_from_lat_lon(upper_lat, upper_lon2),
        ]);
        faces.push([
            unit_from_lat_lon(upper_lat, upper_lon2),
            unit_from_lat_lon(lower_lat, lower_lon1),
            unit_from_lat_lon(lower_lat, lower_lon2),
        ]);
        faces.push([
            unit_from_lat_lon(lower_lat, lower_lon1),
            unit_from_lat_lon(-FRAC_PI_2, 0.0),
            unit_from_lat_lon(lower_lat, lower_lon2),
        ]);
    }
    faces
}

/// Split one spherical triangle into four by geodesic edge bisection: each
/// midpoint is the renormalized average of its endpoints, so every new vertex
/// lies back on the unit sphere. Three corner children plus the center child.
pub fn subdivide_face(face: &[Point3; 3]) -> [[Point3; 3]; 4] {
    let [v0, v1, v2] = *face;
    let m01 = ((v0 + v1) * 0.5).normalize();
    let m12 = ((v1 + v2) * 0.5).normalize();
    let m20 = ((v2 + v0) * 0.5).normalize();
    [
        [v0, m01, m20],
        [m01, v1, m12],
        [m12, v2, m20],
        [m01, m12, m20],
    ]
}
