pub mod shapes;
pub mod triangle_mesh;

pub use shapes::{cuboid, icosphere};
pub use triangle_mesh::TriangleMesh;
