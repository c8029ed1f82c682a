pub mod ellipsoid;
pub mod icosahedron;

pub use ellipsoid::{Ellipsoid, Geodetic};
pub use icosahedron::{base_faces, subdivide_face};
