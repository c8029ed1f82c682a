use std::f64::consts::PI;

use tellus_math::{Aabb3, DMat4, Point3, Sphere, Vector3};

/// A 3D perspective camera with look-at controls.
///
/// Up defaults to +Z to match the ellipsoid's polar axis.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3,
    pub target: Point3,
    pub up: Vector3,
    pub fov_y: f64, // vertical FOV in radians
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(
        eye: Point3,
        target: Point3,
        up: Vector3,
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y,
            aspect,
            near,
            far,
        }
    }

    pub fn forward(&self) -> Vector3 {
        (self.target - self.eye).normalize()
    }

    /// World-space view matrix (right-handed look-at).
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View matrix with the eye moved to the origin. Used together with
    /// camera-relative geometry so that positions near the eye keep full
    /// floating-point precision at planetary coordinate magnitudes.
    pub fn relative_view_matrix(&self) -> DMat4 {
        DMat4::look_to_rh(Point3::ZERO, self.forward(), self.up)
    }

    /// OpenGL-style perspective projection (NDC z in [-1, 1]).
    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn relative_view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.relative_view_matrix()
    }

    /// Orbit the camera around the target. `delta_x` swings azimuth around
    /// +Z, `delta_y` tilts towards the poles; both in radians.
    pub fn orbit(&mut self, delta_x: f64, delta_y: f64) {
        let offset = self.eye - self.target;
        let radius = offset.length();

        let theta = offset.y.atan2(offset.x);
        let phi = (offset.z / radius).acos();

        let new_theta = theta + delta_x;
        let new_phi = (phi + delta_y).clamp(0.01, PI - 0.01);

        self.eye = self.target
            + Vector3::new(
                radius * new_phi.sin() * new_theta.cos(),
                radius * new_phi.sin() * new_theta.sin(),
                radius * new_phi.cos(),
            );
    }

    /// Zoom by moving the camera along the view direction. Positive moves
    /// closer; the eye never crosses the target.
    pub fn zoom(&mut self, delta: f64) {
        let direction = self.forward();
        let new_eye = self.eye + direction * delta;
        if (self.target - new_eye).length() > 0.1 {
            self.eye = new_eye;
        }
    }

    /// Pan the camera and target together in the view plane.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);

        let offset = right * dx + up * dy;
        self.eye += offset;
        self.target += offset;
    }

    /// Re-aim at the box center and back off far enough to see all of it.
    pub fn fit_to_aabb(&mut self, aabb: &Aabb3) {
        let center = aabb.center();
        let size = aabb.extents();
        let max_dim = size.x.max(size.y).max(size.z);

        let distance = max_dim / (2.0 * (self.fov_y / 2.0).tan());

        let view_dir = self.forward();
        self.target = center;
        self.eye = center - view_dir * distance * 1.5;
    }

    /// Re-aim at the sphere center so the whole sphere fits in the vertical
    /// field of view.
    pub fn fit_to_sphere(&mut self, sphere: &Sphere) {
        let distance = sphere.radius / (self.fov_y / 2.0).sin();

        let view_dir = self.forward();
        self.target = sphere.center;
        self.eye = sphere.center - view_dir * distance * 1.1;
    }
}

impl Default for Camera {
    /// Eye at (0, -5, 0) looking at the origin with +Z up, 45 degree FOV,
    /// 16:9 aspect.
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, -5.0, 0.0),
            target: Point3::ZERO,
            up: Vector3::Z,
            fov_y: std::f64::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}
