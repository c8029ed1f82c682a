use std::f64::consts::{PI, TAU};
use std::ops::Index;

use slotmap::{new_key_type, SlotMap};
use tellus_math::{Aabb3, Point2, Point3, Ray};

use crate::traits::{AltitudeSource, TessellationBackend};
use crate::vertex::{fix_texture_coordinates, Vertex};

new_key_type! {
    pub struct SegmentId;
}

/// Opaque reference to a texture owned by the backend's pool. The segment
/// never manages the texture's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Location of this segment's vertex data in a backend-shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSlot {
    pub pool: u32,
    pub index: u32,
}

/// One triangular patch of the tessellated surface.
///
/// Corners always lie on the ray from the body center through their unit
/// base vector, at the radius the altitude source supplied. Children, once
/// created, are cached for good: splitting is idempotent and a segment is
/// never merged back.
#[derive(Debug, Clone)]
pub struct Segment {
    vertices: [Vertex; 3],
    bounds: Aabb3,
    children: Option<[SegmentId; 4]>,
    texture: Option<TextureHandle>,
    pub buffer_slot: Option<BufferSlot>,
}

impl Segment {
    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    pub fn corners(&self) -> [Point3; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }

    pub fn bounds(&self) -> &Aabb3 {
        &self.bounds
    }

    pub fn children(&self) -> Option<[SegmentId; 4]> {
        self.children
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    pub fn set_texture(&mut self, handle: TextureHandle) {
        self.texture = Some(handle);
    }

    pub fn clear_texture(&mut self) {
        self.texture = None;
    }

    /// Distance along the ray to this segment's triangle, if hit.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let [a, b, c] = self.corners();
        ray.intersect_triangle(a, b, c)
    }
}

/// Arena holding every segment ever created, keyed by stable ids.
#[derive(Debug, Default)]
pub struct SegmentArena {
    segments: SlotMap<SegmentId, Segment>,
}

impl SegmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    pub fn get_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.get_mut(id)
    }

    /// Build a segment from three corner points (any radius; each is
    /// projected back onto the surface).
    ///
    /// Per corner: normalize to the unit sphere, derive azimuth/elevation and
    /// the longitude/latitude texture coordinate, sample the altitude source
    /// for the surface radius, and displace along the base vector. Texture
    /// coordinates are then seam-corrected pairwise, and the backend's
    /// created-hook runs once.
    pub fn create_segment(
        &mut self,
        corners: [Point3; 3],
        altitude: &dyn AltitudeSource,
        backend: &mut dyn TessellationBackend,
    ) -> SegmentId {
        let mut vertices = corners.map(|p| {
            let base = p.normalize();
            let azimuth = base.y.atan2(base.x);
            let elevation = base.z.asin();
            let radius = altitude.altitude(azimuth, elevation);
            Vertex {
                base,
                position: base * radius,
                normal: base,
                uv: Point2::new(azimuth / TAU + 0.5, elevation / PI + 0.5),
                color: None,
            }
        });
        fix_texture_coordinates(&mut vertices);

        let [p0, p1, p2] = [
            vertices[0].position,
            vertices[1].position,
            vertices[2].position,
        ];
        let bounds = Aabb3::new(p0.min(p1).min(p2), p0.max(p1).max(p2));

        let id = self.segments.insert(Segment {
            vertices,
            bounds,
            children: None,
            texture: None,
            buffer_slot: None,
        });
        backend.segment_created(id, &mut self.segments[id]);
        id
    }

    /// Split a segment into four children by geodesic edge bisection,
    /// creating them on first call and returning the cached ids afterwards.
    ///
    /// Each child re-samples the altitude source and re-derives its texture
    /// coordinates through `create_segment`; nothing is interpolated from the
    /// parent. Degenerate (zero-area) parents are not detected and would
    /// propagate silently.
    pub fn subdivide(
        &mut self,
        id: SegmentId,
        altitude: &dyn AltitudeSource,
        backend: &mut dyn TessellationBackend,
    ) -> [SegmentId; 4] {
        if let Some(children) = self.segments[id].children {
            return children;
        }

        let [a, b, c] = self.segments[id].corners();
        let m_ab = (a + b) * 0.5;
        let m_bc = (b + c) * 0.5;
        let m_ca = (c + a) * 0.5;

        let children = [
            self.create_segment([a, m_ab, m_ca], altitude, backend),
            self.create_segment([m_ab, b, m_bc], altitude, backend),
            self.create_segment([m_bc, c, m_ca], altitude, backend),
            self.create_segment([m_ab, m_bc, m_ca], altitude, backend),
        ];
        self.segments[id].children = Some(children);
        children
    }
}

impl Index<SegmentId> for SegmentArena {
    type Output = Segment;

    fn index(&self, id: SegmentId) -> &Segment {
        &self.segments[id]
    }
}
