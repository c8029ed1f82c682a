//! Adaptive tessellation of an ellipsoidal body.
//!
//! A geodesically subdivided icosahedron covers the surface with triangular
//! segments. Each frame the segment forest is walked against the view frustum
//! and the projected screen-space size of every segment, refining (lazily
//! subdividing) where a segment would look coarse on screen and culling
//! subtrees that fall outside the view. Coarsening is a traversal decision,
//! never a deallocation: segments live in an arena and, once split, keep
//! their children for the rest of the session.

pub mod lod;
pub mod segment;
pub mod traits;
pub mod vertex;

pub use lod::{LodConfig, Tessellation};
pub use segment::{BufferSlot, Segment, SegmentArena, SegmentId, TextureHandle};
pub use traits::{AltitudeSource, EllipsoidAltitude, FnAltitude, Projector, TessellationBackend};
pub use vertex::{fix_texture_coordinates, Vertex};
