//! Oblate spheroid model: ray intersection and cartesian/geodetic conversion.

use serde::{Deserialize, Serialize};
use tellus_core::{Result, TellusError, Tolerance, Validate};
use tellus_math::{Point3, Ray};

const EPS: f64 = Tolerance::GEOMETRIC;

/// Toms region constant: cos(67.5 degrees), the latitude at which the
/// altitude formula switches branch for numerical stability.
const COS_67P5: f64 = 0.382_683_432_365_089_77;

/// Toms height-optimized auxiliary-latitude correction factor.
const AD_C: f64 = 1.002_600_0;

/// A geodetic position: longitude/latitude in degrees, altitude in meters
/// above the ellipsoid surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

impl Geodetic {
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
        }
    }
}

/// An oblate spheroid with its polar (flattened) axis along +Z.
///
/// Shape parameters are fixed at construction; the eccentricity constants
/// are derived once and cached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub center: Point3,
    pub semi_major_axis: f64,
    pub flattening: f64,
    semi_minor_axis: f64,
    /// First eccentricity squared: f * (2 - f).
    ecc2: f64,
    /// Second eccentricity squared: ecc2 / (1 - ecc2).
    ecc_prime2: f64,
}

impl Ellipsoid {
    pub fn new(center: Point3, semi_major_axis: f64, flattening: f64) -> Self {
        let ecc2 = flattening * (2.0 - flattening);
        Self {
            center,
            semi_major_axis,
            flattening,
            semi_minor_axis: semi_major_axis * (1.0 - flattening),
            ecc2,
            ecc_prime2: ecc2 / (1.0 - ecc2),
        }
    }

    /// A unit sphere centered at the origin.
    pub fn unit_sphere() -> Self {
        Self::new(Point3::ZERO, 1.0, 0.0)
    }

    /// The WGS84 reference ellipsoid.
    pub fn wgs84() -> Self {
        Self::new(Point3::ZERO, 6_378_137.0, 1.0 / 298.257_223_563)
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    pub fn first_eccentricity_squared(&self) -> f64 {
        self.ecc2
    }

    pub fn second_eccentricity_squared(&self) -> f64 {
        self.ecc_prime2
    }

    /// Intersections of a ray with the ellipsoid surface: 0, 1 or 2 points,
    /// nearest first. Both roots of the quadratic are reported when the ray
    /// passes through; a discriminant within epsilon of zero is the tangent
    /// case and yields a single point.
    pub fn ray_intersections(&self, ray: &Ray) -> Vec<Point3> {
        // Scaling the polar axis by 1/(1-f) maps the spheroid onto a sphere
        // of radius semi_major_axis.
        let m = 1.0 / (1.0 - self.flattening);
        let m2 = m * m;

        let o = ray.origin - self.center;
        let d = ray.direction;

        let a = d.x * d.x + d.y * d.y + m2 * d.z * d.z;
        let b = 2.0 * (o.x * d.x + o.y * d.y + m2 * o.z * d.z);
        let c = o.x * o.x + o.y * o.y + m2 * o.z * o.z
            - self.semi_major_axis * self.semi_major_axis;

        let disc = b * b - 4.0 * a * c;

        if disc.abs() <= EPS {
            // Tangent ray.
            if a.abs() <= EPS {
                return Vec::new();
            }
            return vec![ray.at(-b / (2.0 * a))];
        }
        if disc > 0.0 {
            let root = disc.sqrt();
            let t0 = (-b - root) / (2.0 * a);
            let t1 = (-b + root) / (2.0 * a);
            return vec![ray.at(t0.min(t1)), ray.at(t0.max(t1))];
        }
        // disc < 0: no real roots unless the quadratic degenerated to a line.
        if a.abs() <= EPS && b.abs() > EPS {
            return vec![ray.at(-c / b)];
        }
        Vec::new()
    }

    /// Convert a cartesian point to geodetic longitude/latitude/altitude
    /// using Toms' 1996 closed-form method (corrected Bowring auxiliary
    /// latitude, branch-selected altitude formula).
    ///
    /// The planet center maps to the sentinel altitude `-semi_minor_axis`;
    /// points on the polar axis are handled explicitly.
    pub fn to_geodetic(&self, point: Point3) -> Geodetic {
        let p = point - self.center;
        let w2 = p.x * p.x + p.y * p.y;
        let w = w2.sqrt();
        let z = p.z;

        if w <= EPS {
            if z.abs() <= EPS {
                return Geodetic::new(0.0, 0.0, -self.semi_minor_axis);
            }
            let latitude = if z > 0.0 { 90.0 } else { -90.0 };
            return Geodetic::new(0.0, latitude, z.abs() - self.semi_minor_axis);
        }

        let longitude = p.y.atan2(p.x);

        // First Bowring approximation of the auxiliary latitude.
        let t0 = z * AD_C;
        let s0 = (t0 * t0 + w2).sqrt();
        let sin_b0 = t0 / s0;
        let cos_b0 = w / s0;
        let sin3_b0 = sin_b0 * sin_b0 * sin_b0;

        // Corrected estimate of the geodetic latitude.
        let t1 = z + self.semi_minor_axis * self.ecc_prime2 * sin3_b0;
        let sum = w - self.semi_major_axis * self.ecc2 * cos_b0 * cos_b0 * cos_b0;
        let s1 = (t1 * t1 + sum * sum).sqrt();
        let sin_p1 = t1 / s1;
        let cos_p1 = sum / s1;

        // Prime vertical radius of curvature.
        let rn = self.semi_major_axis / (1.0 - self.ecc2 * sin_p1 * sin_p1).sqrt();

        let altitude = if cos_p1 >= COS_67P5 {
            w / cos_p1 - rn
        } else if cos_p1 <= -COS_67P5 {
            w / -cos_p1 - rn
        } else {
            z / sin_p1 + rn * (self.ecc2 - 1.0)
        };

        let latitude = sin_p1.atan2(cos_p1);

        Geodetic::new(longitude.to_degrees(), latitude.to_degrees(), altitude)
    }

    /// Distance from the body center to the surface in a direction with the
    /// given geocentric elevation angle (radians from the equatorial plane).
    pub fn geocentric_radius(&self, elevation: f64) -> f64 {
        let (sin_e, cos_e) = elevation.sin_cos();
        let a = self.semi_major_axis;
        let b = self.semi_minor_axis;
        a * b / ((a * sin_e).powi(2) + (b * cos_e).powi(2)).sqrt()
    }

    /// Convert a geodetic position back to cartesian coordinates.
    pub fn from_geodetic(&self, g: Geodetic) -> Point3 {
        let lat = g.latitude.to_radians();
        let lon = g.longitude.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let rn = self.semi_major_axis / (1.0 - self.ecc2 * sin_lat * sin_lat).sqrt();

        self.center
            + Point3::new(
                (rn + g.altitude) * cos_lat * cos_lon,
                (rn + g.altitude) * cos_lat * sin_lon,
                (rn * (1.0 - self.ecc2) + g.altitude) * sin_lat,
            )
    }
}

impl Validate for Ellipsoid {
    fn validate(&self) -> Result<()> {
        if self.semi_major_axis <= 0.0 {
            return Err(TellusError::Geometry(format!(
                "non-positive semi-major axis: {}",
                self.semi_major_axis
            )));
        }
        if !(0.0..1.0).contains(&self.flattening) {
            return Err(TellusError::Geometry(format!(
                "flattening {} outside [0, 1)",
                self.flattening
            )));
        }
        Ok(())
    }
}
