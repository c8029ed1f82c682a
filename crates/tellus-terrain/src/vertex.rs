use tellus_math::{Point2, Point3, Vector3};

/// Texture U coordinates further apart than this (in normalized [0,1] space)
/// are assumed to wrap across the +/-180 degree seam.
pub const SEAM_THRESHOLD: f64 = 0.75;

/// One corner of a surface segment.
///
/// `base` is the unit-sphere direction; `position` is `base` scaled by the
/// sampled surface radius, so the vertex always lies on the ray from the body
/// center through `base`. Immutable after construction except for the texture
/// coordinate, which may be nudged for seam continuity.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub base: Vector3,
    pub position: Point3,
    pub normal: Vector3,
    pub uv: Point2,
    pub color: Option<[f32; 4]>,
}

/// Repair texture coordinates that wrap backward across the longitude seam.
///
/// For each pair of corners whose U difference exceeds [`SEAM_THRESHOLD`],
/// the smaller U is pushed up by a full texture repeat so interpolation runs
/// forward across the seam instead of sweeping back around the globe.
pub fn fix_texture_coordinates(vertices: &mut [Vertex; 3]) {
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        let du = vertices[i].uv.x - vertices[j].uv.x;
        if du > SEAM_THRESHOLD {
            vertices[j].uv.x += 1.0;
        } else if du < -SEAM_THRESHOLD {
            vertices[i].uv.x += 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tellus_math::DVec2;

    fn vertex_with_u(u: f64) -> Vertex {
        Vertex {
            base: Vector3::X,
            position: Vector3::X,
            normal: Vector3::X,
            uv: DVec2::new(u, 0.5),
            color: None,
        }
    }

    #[test]
    fn test_seam_wrap_pushes_smaller_u() {
        let mut vertices = [vertex_with_u(0.05), vertex_with_u(0.98), vertex_with_u(0.97)];
        fix_texture_coordinates(&mut vertices);
        assert!((vertices[0].uv.x - 1.05).abs() < 1e-12);
        assert!((vertices[1].uv.x - 0.98).abs() < 1e-12);
        assert!((vertices[2].uv.x - 0.97).abs() < 1e-12);
    }

    #[test]
    fn test_no_wrap_untouched() {
        let mut vertices = [vertex_with_u(0.40), vertex_with_u(0.45), vertex_with_u(0.50)];
        fix_texture_coordinates(&mut vertices);
        assert!((vertices[0].uv.x - 0.40).abs() < 1e-12);
        assert!((vertices[1].uv.x - 0.45).abs() < 1e-12);
        assert!((vertices[2].uv.x - 0.50).abs() < 1e-12);
    }

    #[test]
    fn test_two_low_corners_both_lifted() {
        let mut vertices = [vertex_with_u(0.02), vertex_with_u(0.04), vertex_with_u(0.95)];
        fix_texture_coordinates(&mut vertices);
        assert!((vertices[0].uv.x - 1.02).abs() < 1e-12);
        assert!((vertices[1].uv.x - 1.04).abs() < 1e-12);
        assert!((vertices[2].uv.x - 0.95).abs() < 1e-12);
    }
}
