//! Shapes supported by walkthrough3d.

pub use self::collision_model::CollisionModel;
pub use self::collision_polytope::CollisionPolytope;
pub use self::plane::Plane;
pub use self::trimesh::{TriMesh, TriMeshBuilderError};

mod collision_model;
mod collision_polytope;
mod plane;
mod trimesh;
