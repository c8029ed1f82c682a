//! End-to-end checks of the per-frame LOD selection over a unit sphere.
//!
//! All scenarios seed with `pre_subdivisions = 0` (the bare 20 icosahedron
//! faces) so expected segment counts stay small.

use std::collections::HashSet;

use tellus_geometry::Ellipsoid;
use tellus_math::{DMat4, DVec3, Frustum, Point2, Point3, Ray};
use tellus_terrain::{
    BufferSlot, FnAltitude, LodConfig, Projector, Segment, SegmentId, Tessellation,
    TessellationBackend, TextureHandle,
};

/// Backend that counts hook invocations and optionally hands every new
/// segment a texture immediately.
#[derive(Default)]
struct RecordingBackend {
    assign_textures: bool,
    created: usize,
    entered: usize,
    released: Vec<SegmentId>,
}

impl RecordingBackend {
    fn with_textures() -> Self {
        Self {
            assign_textures: true,
            ..Self::default()
        }
    }
}

impl TessellationBackend for RecordingBackend {
    fn segment_created(&mut self, _id: SegmentId, segment: &mut Segment) {
        if self.assign_textures {
            segment.set_texture(TextureHandle(self.created as u64));
        }
        segment.buffer_slot = Some(BufferSlot {
            pool: 0,
            index: self.created as u32,
        });
        self.created += 1;
    }

    fn segment_entered(&mut self, _id: SegmentId, _segment: &mut Segment) {
        self.entered += 1;
    }

    fn segment_released(&mut self, id: SegmentId, _segment: &mut Segment) {
        self.released.push(id);
    }
}

/// Every point lands on the same pixel: zero projected extent, so nothing
/// ever asks to refine.
struct PinpointProjector;

impl Projector for PinpointProjector {
    fn project(&self, _point: Point3) -> Option<Point2> {
        Some(Point2::new(400.0, 300.0))
    }
}

/// Wildly magnifying projection: every segment looks enormous on screen and
/// the walk refines until some other rule stops it.
struct MagnifyingProjector;

impl Projector for MagnifyingProjector {
    fn project(&self, point: Point3) -> Option<Point2> {
        Some(Point2::new(
            (point.x + 2.0 * point.z) * 1.0e9,
            (point.y + 2.0 * point.z) * 1.0e9,
        ))
    }
}

/// Simulates corners at or behind the eye plane.
struct FailingProjector;

impl Projector for FailingProjector {
    fn project(&self, _point: Point3) -> Option<Point2> {
        None
    }
}

fn seed_config() -> LodConfig {
    LodConfig {
        pre_subdivisions: 0,
        ..LodConfig::default()
    }
}

fn unit_tessellation(config: LodConfig, backend: &mut RecordingBackend) -> Tessellation {
    Tessellation::new(
        Ellipsoid::unit_sphere(),
        config,
        Box::new(FnAltitude(|_az: f64, _el: f64| 1.0)),
        backend,
    )
}

/// Frustum from a camera at `eye` looking at `target`, wide enough to hold
/// the whole unit sphere when aimed at it.
fn frustum_from(eye: DVec3, target: DVec3) -> Frustum {
    let view = DMat4::look_at_rh(eye, target, DVec3::Z);
    let proj = DMat4::perspective_rh_gl(60f64.to_radians(), 4.0 / 3.0, 0.1, 100.0);
    Frustum::from_view_projection(&(proj * view)).expect("well-formed view projection")
}

fn facing_frustum() -> Frustum {
    frustum_from(DVec3::new(5.0, 0.0, 0.0), DVec3::ZERO)
}

fn averted_frustum() -> Frustum {
    frustum_from(DVec3::new(5.0, 0.0, 0.0), DVec3::new(10.0, 0.0, 0.0))
}

#[test]
fn test_seeding_creates_twenty_roots() {
    let mut backend = RecordingBackend::with_textures();
    let tess = unit_tessellation(seed_config(), &mut backend);
    assert_eq!(tess.roots().len(), 20);
    assert_eq!(tess.segment_count(), 20);
    assert_eq!(backend.created, 20);
    for &root in tess.roots() {
        let segment = tess.segment(root).unwrap();
        assert!(segment.has_texture());
        assert!(segment.buffer_slot.is_some());
    }
}

#[test]
fn test_small_projection_renders_roots_without_refining() {
    let mut backend = RecordingBackend::with_textures();
    let mut tess = unit_tessellation(seed_config(), &mut backend);

    let rendered = tess
        .tick(&facing_frustum(), Point3::ZERO, &PinpointProjector, &mut backend)
        .clone();

    let roots: HashSet<SegmentId> = tess.roots().iter().copied().collect();
    assert_eq!(rendered, roots);
    // No segment asked to refine, so the forest is still just the seeds.
    assert_eq!(tess.segment_count(), 20);
    assert_eq!(backend.entered, 20);
    assert!(backend.released.is_empty());
}

#[test]
fn test_refinement_blocked_until_children_textured() {
    // Textures are withheld, so however large segments look on screen the
    // walk must keep rendering parents.
    let mut backend = RecordingBackend::default();
    let mut tess = unit_tessellation(seed_config(), &mut backend);

    let rendered = tess
        .tick(&facing_frustum(), Point3::ZERO, &MagnifyingProjector, &mut backend)
        .clone();

    let roots: HashSet<SegmentId> = tess.roots().iter().copied().collect();
    assert_eq!(rendered, roots);
    // Each root split once speculatively; no grandchildren yet.
    assert_eq!(tess.segment_count(), 20 + 20 * 4);
}

#[test]
fn test_refinement_descends_to_depth_cap() {
    let config = LodConfig {
        max_depth: 2,
        ..seed_config()
    };
    let mut backend = RecordingBackend::with_textures();
    let mut tess = unit_tessellation(config, &mut backend);

    let rendered = tess
        .tick(&facing_frustum(), Point3::ZERO, &MagnifyingProjector, &mut backend)
        .clone();

    // The frustum holds the whole sphere (no occlusion culling), so every
    // root refines all the way to the cap: 20 * 4^2 leaves.
    assert_eq!(rendered.len(), 20 * 16);
    for &id in &rendered {
        assert!(tess.segment(id).expect("rendered id is live").has_texture());
    }
}

#[test]
fn test_averted_view_releases_everything() {
    let mut backend = RecordingBackend::with_textures();
    let mut tess = unit_tessellation(seed_config(), &mut backend);

    let first = tess
        .tick(&facing_frustum(), Point3::ZERO, &PinpointProjector, &mut backend)
        .len();
    assert_eq!(first, 20);

    let second = tess
        .tick(&averted_frustum(), Point3::ZERO, &PinpointProjector, &mut backend)
        .clone();
    assert!(second.is_empty());
    assert_eq!(backend.released.len(), 20);
}

#[test]
fn test_unprojectable_corner_renders_current_level() {
    let mut backend = RecordingBackend::with_textures();
    let mut tess = unit_tessellation(seed_config(), &mut backend);

    let rendered = tess
        .tick(&facing_frustum(), Point3::ZERO, &FailingProjector, &mut backend)
        .clone();

    let roots: HashSet<SegmentId> = tess.roots().iter().copied().collect();
    assert_eq!(rendered, roots);
    assert_eq!(tess.segment_count(), 20);
}

#[test]
fn test_camera_relative_origin_offsets_culling() {
    let mut backend = RecordingBackend::with_textures();
    let mut tess = unit_tessellation(seed_config(), &mut backend);

    // Camera at x = 5 looking towards +X sees nothing of a body at the
    // world origin...
    let empty = tess
        .tick(&averted_frustum(), Point3::ZERO, &PinpointProjector, &mut backend)
        .len();
    assert_eq!(empty, 0);

    // ...but re-centering on an origin 50 units down -X shifts the body to
    // x = +50 in camera-relative space, squarely inside that same frustum.
    let rendered = tess
        .tick(
            &averted_frustum(),
            DVec3::new(-50.0, 0.0, 0.0),
            &PinpointProjector,
            &mut backend,
        )
        .len();
    assert_eq!(rendered, 20);
}

#[test]
fn test_pick_hits_rendered_surface() {
    let mut backend = RecordingBackend::with_textures();
    let mut tess = unit_tessellation(seed_config(), &mut backend);
    tess.tick(&facing_frustum(), Point3::ZERO, &PinpointProjector, &mut backend);

    let ray = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::new(-1.0, 0.0, 0.0));
    let (id, t) = tess.pick(&ray).expect("ray through the body must hit");
    assert!(tess.rendered().contains(&id));
    // Unit sphere surface from x = 10 looking down -X.
    assert!(t > 8.0 && t < 10.0);

    let miss = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0));
    assert!(tess.pick(&miss).is_none());
}

#[test]
fn test_rendered_mesh_matches_rendered_set() {
    let mut backend = RecordingBackend::with_textures();
    let mut tess = unit_tessellation(seed_config(), &mut backend);
    let count = tess
        .tick(&facing_frustum(), Point3::ZERO, &PinpointProjector, &mut backend)
        .len();

    let mesh = tess.rendered_mesh();
    assert_eq!(mesh.positions.len(), count * 3);
    assert_eq!(mesh.indices.len(), count * 3);
    assert_eq!(mesh.normals.len(), mesh.positions.len());
    assert_eq!(mesh.uvs.len(), mesh.positions.len());
    for p in &mesh.positions {
        assert!((p.length() - 1.0).abs() < 1e-9);
    }
}
