//! Per-frame level-of-detail traversal over the segment forest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tellus_geometry::{base_faces, subdivide_face, Ellipsoid};
use tellus_math::{Containment, Frustum, Point2, Point3, Ray, Sphere};
use tellus_mesh::TriangleMesh;

use crate::segment::{Segment, SegmentArena, SegmentId};
use crate::traits::{AltitudeSource, Projector, TessellationBackend};

/// Tuning knobs for the refine/coarsen decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LodConfig {
    /// A segment whose projected bounding rectangle is wider or taller than
    /// this many pixels (scaled by `load_factor`) is refined.
    pub screen_edge_factor: f64,
    /// A segment whose projected bounding rectangle covers more than this
    /// many square pixels (scaled by `load_factor`) is refined.
    pub screen_area_factor: f64,
    /// Scales both thresholds: below 1.0 trades quality for load, above 1.0
    /// the other way.
    pub load_factor: f64,
    /// Hard cap on subdivision depth below the seed segments, bounding
    /// worst-case memory under pathological view configurations.
    pub max_depth: u32,
    /// Geodesic pre-subdivisions of the 20 icosahedron faces at seed time;
    /// 2 gives 320 top-level segments.
    pub pre_subdivisions: u32,
}

impl LodConfig {
    pub const SCREEN_EDGE_FACTOR: f64 = 500.0;
    pub const SCREEN_AREA_FACTOR: f64 = 0.5 * 500.0 * 500.0;
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            screen_edge_factor: Self::SCREEN_EDGE_FACTOR,
            screen_area_factor: Self::SCREEN_AREA_FACTOR,
            load_factor: 0.75,
            max_depth: 24,
            pre_subdivisions: 2,
        }
    }
}

/// Adaptive tessellation of one ellipsoidal body.
///
/// Owns the segment forest and the set of segments chosen for rendering this
/// frame. The per-frame entry point is [`Tessellation::tick`]; everything
/// runs synchronously on the caller's thread, driven by an external frame
/// clock.
pub struct Tessellation {
    ellipsoid: Ellipsoid,
    config: LodConfig,
    altitude: Box<dyn AltitudeSource>,
    arena: SegmentArena,
    roots: Vec<SegmentId>,
    rendered: HashSet<SegmentId>,
    bounding_sphere: Sphere,
}

impl Tessellation {
    /// Seed the forest: the 20 icosahedron faces, geodesically pre-subdivided
    /// `config.pre_subdivisions` times, become the top-level segments. The
    /// backend's created-hook runs for every seed segment.
    pub fn new(
        ellipsoid: Ellipsoid,
        config: LodConfig,
        altitude: Box<dyn AltitudeSource>,
        backend: &mut dyn TessellationBackend,
    ) -> Self {
        let mut faces = base_faces();
        for _ in 0..config.pre_subdivisions {
            let coarse = std::mem::take(&mut faces);
            for face in &coarse {
                faces.extend(subdivide_face(face));
            }
        }

        let mut arena = SegmentArena::new();
        let roots: Vec<SegmentId> = faces
            .iter()
            .map(|face| arena.create_segment(*face, altitude.as_ref(), backend))
            .collect();

        // The forest lives in body-local coordinates; placement in the world
        // is the caller's `origin` at tick time.
        let mut corners = Vec::with_capacity(roots.len() * 3);
        for &root in &roots {
            corners.extend(arena[root].corners());
        }
        let bounding_sphere = Sphere::enclosing(Point3::ZERO, &corners);

        Self {
            ellipsoid,
            config,
            altitude,
            arena,
            roots,
            rendered: HashSet::new(),
            bounding_sphere,
        }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    pub fn bounding_sphere(&self) -> Sphere {
        self.bounding_sphere
    }

    pub fn roots(&self) -> &[SegmentId] {
        &self.roots
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.arena.get(id)
    }

    pub fn segment_count(&self) -> usize {
        self.arena.len()
    }

    /// The segments selected by the most recent [`tick`](Self::tick).
    pub fn rendered(&self) -> &HashSet<SegmentId> {
        &self.rendered
    }

    pub fn set_load_factor(&mut self, load_factor: f64) {
        self.config.load_factor = load_factor.max(0.0);
    }

    /// Run one frame of LOD selection.
    ///
    /// `origin` is the camera-relative origin: segment bounds and corners are
    /// re-centered on it before classification and projection, and the
    /// frustum and projector are expected in the same re-centered space.
    ///
    /// The new rendered set is computed in full before any resource release:
    /// segments that dropped out of the previous frame's set get the
    /// backend's release hook afterwards, and newly visible segments its
    /// entered hook.
    pub fn tick(
        &mut self,
        frustum: &Frustum,
        origin: Point3,
        projector: &dyn Projector,
        backend: &mut dyn TessellationBackend,
    ) -> &HashSet<SegmentId> {
        let previous = std::mem::take(&mut self.rendered);
        let mut current = HashSet::with_capacity(previous.len().max(self.roots.len()));

        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.visit(root, frustum, origin, projector, backend, false, 0, &mut current);
        }

        let mut released = 0usize;
        for &id in previous.difference(&current) {
            if let Some(segment) = self.arena.get_mut(id) {
                backend.segment_released(id, segment);
                released += 1;
            }
        }
        let mut entered = 0usize;
        for &id in current.difference(&previous) {
            if let Some(segment) = self.arena.get_mut(id) {
                backend.segment_entered(id, segment);
                entered += 1;
            }
        }

        log::debug!(
            "lod tick: {} rendered ({} entered, {} released), {} segments total",
            current.len(),
            entered,
            released,
            self.arena.len()
        );

        self.rendered = current;
        &self.rendered
    }

    /// One node of the refine/coarsen walk. Returns nothing; selected
    /// segments accumulate in `out`.
    #[allow(clippy::too_many_arguments)]
    fn visit(
        &mut self,
        id: SegmentId,
        frustum: &Frustum,
        origin: Point3,
        projector: &dyn Projector,
        backend: &mut dyn TessellationBackend,
        ignore_frustum: bool,
        depth: u32,
        out: &mut HashSet<SegmentId>,
    ) {
        let mut ignore_frustum = ignore_frustum;
        if !ignore_frustum {
            let bounds = self.arena[id].bounds().translated(-origin);
            match frustum.classify_aabb(&bounds) {
                Containment::Outside => return,
                // A fully contained subtree cannot leave the frustum; skip
                // the test for all descendants this frame.
                Containment::Inside => ignore_frustum = true,
                Containment::Intersecting => {}
            }
        }

        if depth >= self.config.max_depth {
            out.insert(id);
            return;
        }

        // Screen-space extent proxy: the axis-aligned bounding rectangle of
        // the three projected corners. Coarse for thin or rotated triangles,
        // kept for parity with the established behavior.
        let mut lo = Point2::splat(f64::INFINITY);
        let mut hi = Point2::splat(f64::NEG_INFINITY);
        for corner in self.arena[id].corners() {
            match projector.project(corner - origin) {
                Some(s) => {
                    lo = lo.min(s);
                    hi = hi.max(s);
                }
                None => {
                    // A corner at or behind the eye plane cannot be measured;
                    // render at the current level this frame.
                    out.insert(id);
                    return;
                }
            }
        }
        let size = hi - lo;
        let area = size.x * size.y;

        let scale = self.config.load_factor;
        let refine = area >= self.config.screen_area_factor * scale
            || size.x >= self.config.screen_edge_factor * scale
            || size.y >= self.config.screen_edge_factor * scale;

        if !refine {
            out.insert(id);
            return;
        }

        let children = self
            .arena
            .subdivide(id, self.altitude.as_ref(), backend);

        // Never swap in untextured children: render the parent until the
        // backend has populated all four.
        let ready = children.iter().all(|&c| self.arena[c].has_texture());
        if !ready {
            out.insert(id);
            return;
        }

        for child in children {
            self.visit(
                child,
                frustum,
                origin,
                projector,
                backend,
                ignore_frustum,
                depth + 1,
                out,
            );
        }
    }

    /// Nearest intersection of a ray with the currently rendered surface.
    pub fn pick(&self, ray: &Ray) -> Option<(SegmentId, f64)> {
        let mut nearest: Option<(SegmentId, f64)> = None;
        for &id in &self.rendered {
            if let Some(segment) = self.arena.get(id) {
                if let Some(t) = segment.intersect(ray) {
                    if nearest.map_or(true, |(_, best)| t < best) {
                        nearest = Some((id, t));
                    }
                }
            }
        }
        nearest
    }

    /// Snapshot the rendered set as a single triangle soup, ordered by
    /// segment id for reproducibility.
    pub fn rendered_mesh(&self) -> TriangleMesh {
        let mut ids: Vec<SegmentId> = self.rendered.iter().copied().collect();
        ids.sort_unstable();

        let mut mesh = TriangleMesh::default();
        for id in ids {
            if let Some(segment) = self.arena.get(id) {
                let base = mesh.positions.len() as u32;
                for v in segment.vertices() {
                    mesh.positions.push(v.position);
                    mesh.normals.push(v.normal);
                    mesh.uvs.push(v.uv);
                }
                mesh.indices.extend([base, base + 1, base + 2]);
            }
        }
        mesh
    }
}
