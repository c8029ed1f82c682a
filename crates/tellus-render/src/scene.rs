use std::collections::BTreeMap;

use tellus_core::{EntityId, Result, TellusError};
use tellus_math::transform::try_invert;
use tellus_math::{Aabb3, DMat4, DVec4, Frustum, Point2, Point3, Ray};
use tellus_terrain::Projector;

use crate::camera::Camera;
use crate::renderable::{Label, Renderable};

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Immutable per-frame snapshot of the camera: a camera-relative
/// view-projection, the matching frustum, and the world-space origin the
/// relative coordinates are measured from (the eye).
///
/// Geometry handed to [`SceneView::project`] must already be re-centered on
/// [`SceneView::origin`]; this is the projector the terrain traversal
/// consumes.
#[derive(Debug, Clone)]
pub struct SceneView {
    view_projection: DMat4,
    frustum: Frustum,
    viewport: Viewport,
    origin: Point3,
}

impl SceneView {
    pub fn from_camera(camera: &Camera, viewport: Viewport) -> Result<Self> {
        let view_projection = camera.relative_view_projection();
        let frustum = Frustum::from_view_projection(&view_projection)?;
        Ok(Self {
            view_projection,
            frustum,
            viewport,
            origin: camera.eye,
        })
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Camera-relative frustum, suitable for culling geometry translated by
    /// `-origin`.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Ray through a pixel, in world space.
    pub fn pick_ray(&self, pixel: Point2) -> Result<Ray> {
        let inverse = try_invert(&self.view_projection)?;

        let ndc_x = 2.0 * pixel.x / self.viewport.width as f64 - 1.0;
        let ndc_y = 1.0 - 2.0 * pixel.y / self.viewport.height as f64;

        let near = inverse * DVec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far = inverse * DVec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < 1e-15 || far.w.abs() < 1e-15 {
            return Err(TellusError::SingularMatrix);
        }
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Ok(Ray::new(self.origin + near, far - near))
    }

    /// Screen position of a label, if its anchor is in front of the eye.
    pub fn project_label(&self, label: &Label) -> Option<Point2> {
        self.project(label.position - self.origin)
    }
}

impl Projector for SceneView {
    fn project(&self, point: Point3) -> Option<Point2> {
        let clip = self.view_projection * point.extend(1.0);
        if clip.w <= 1e-15 {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(Point2::new(
            (ndc_x + 1.0) * 0.5 * self.viewport.width as f64,
            (1.0 - ndc_y) * 0.5 * self.viewport.height as f64,
        ))
    }
}

/// A camera, a viewport and the objects drawn each frame.
pub struct Scene {
    pub camera: Camera,
    viewport: Viewport,
    renderables: BTreeMap<EntityId, Box<dyn Renderable>>,
    labels: Vec<Label>,
    frame: u64,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        let mut camera = Camera::default();
        camera.aspect = viewport.aspect();
        Self {
            camera,
            viewport,
            renderables: BTreeMap::new(),
            labels: Vec::new(),
            frame: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn add_renderable(&mut self, renderable: Box<dyn Renderable>) -> EntityId {
        let id = EntityId::new();
        self.renderables.insert(id, renderable);
        id
    }

    pub fn remove_renderable(&mut self, id: EntityId) -> Option<Box<dyn Renderable>> {
        self.renderables.remove(&id)
    }

    pub fn renderable(&self, id: EntityId) -> Option<&dyn Renderable> {
        self.renderables.get(&id).map(|r| r.as_ref())
    }

    pub fn renderables(&self) -> impl Iterator<Item = (EntityId, &dyn Renderable)> {
        self.renderables.iter().map(|(&id, r)| (id, r.as_ref()))
    }

    pub fn add_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Union of every renderable's bounds, or `None` for an empty scene.
    pub fn bounds(&self) -> Option<Aabb3> {
        let mut iter = self.renderables.values();
        let first = iter.next()?.bounds();
        Some(iter.fold(first, |acc, r| acc.merge(&r.bounds())))
    }

    pub fn total_triangles(&self) -> usize {
        self.renderables
            .values()
            .map(|r| r.mesh().triangle_count())
            .sum()
    }

    /// Advance the frame clock and give every renderable its update step.
    pub fn advance_frame(&mut self, dt: f64) {
        self.frame += 1;
        for renderable in self.renderables.values_mut() {
            renderable.update(dt);
        }
    }

    /// Snapshot the current camera state for this frame's culling,
    /// projection and picking.
    pub fn view(&self) -> Result<SceneView> {
        SceneView::from_camera(&self.camera, self.viewport)
    }
}
