//! Scene layer: camera controls, per-frame view snapshots feeding the
//! terrain traversal, and debug renderables.

pub mod camera;
pub mod renderable;
pub mod scene;

pub use camera::Camera;
pub use renderable::{BoxRenderable, FrustumRenderable, Label, Renderable, SphereRenderable};
pub use scene::{Scene, SceneView, Viewport};
