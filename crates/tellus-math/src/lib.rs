pub mod aabb;
pub mod frustum;
pub mod plane;
pub mod ray;
pub mod sphere;
pub mod transform;

pub use glam::{DAffine3, DMat3, DMat4, DVec2, DVec3, DVec4};

pub use aabb::Aabb3;
pub use frustum::{Containment, Frustum};
pub use plane::Plane;
pub use ray::Ray;
pub use sphere::Sphere;
pub use transform::Transform;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
