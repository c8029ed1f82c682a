//! Narrow interfaces to the out-of-scope collaborators: terrain elevation,
//! screen-space projection, and the rendering backend.

use tellus_geometry::Ellipsoid;
use tellus_math::{Point2, Point3};

use crate::segment::{Segment, SegmentId};

/// Supplies the surface radius (distance from the body center, in model
/// units) for a direction given as azimuth/elevation in radians. Invoked once
/// per vertex at segment creation; implementations may cache internally.
pub trait AltitudeSource {
    fn altitude(&self, azimuth: f64, elevation: f64) -> f64;
}

/// Adapter turning a closure into an [`AltitudeSource`].
#[derive(Debug, Clone, Copy)]
pub struct FnAltitude<F>(pub F);

impl<F> AltitudeSource for FnAltitude<F>
where
    F: Fn(f64, f64) -> f64,
{
    fn altitude(&self, azimuth: f64, elevation: f64) -> f64 {
        (self.0)(azimuth, elevation)
    }
}

/// The bare ellipsoid surface with no terrain displacement.
#[derive(Debug, Clone, Copy)]
pub struct EllipsoidAltitude {
    ellipsoid: Ellipsoid,
}

impl EllipsoidAltitude {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }
}

impl AltitudeSource for EllipsoidAltitude {
    fn altitude(&self, _azimuth: f64, elevation: f64) -> f64 {
        self.ellipsoid.geocentric_radius(elevation)
    }
}

/// Projects a camera-relative world point to screen pixel coordinates.
/// Returns `None` for points that cannot be projected (at or behind the eye
/// plane).
pub trait Projector {
    fn project(&self, point: Point3) -> Option<Point2>;
}

/// Lifecycle hooks handed to the renderer that owns GPU-side resources.
///
/// `segment_created` runs exactly once per segment and is expected to
/// (possibly asynchronously) assign a texture; refinement into a segment's
/// children is deferred until all four report one. `segment_released` frees
/// backend resources when a segment leaves the rendered set;
/// `segment_entered` gives the backend a re-upload path when it rejoins.
pub trait TessellationBackend {
    fn segment_created(&mut self, id: SegmentId, segment: &mut Segment);

    fn segment_entered(&mut self, _id: SegmentId, _segment: &mut Segment) {}

    fn segment_released(&mut self, id: SegmentId, segment: &mut Segment);
}
