//! Point inclusion and pop-out.

pub use self::point_collision_model::MAX_POP_OUT_PASSES;
pub use self::point_collision_polytope::POP_OUT_EPSILON;
#[doc(inline)]
pub use self::point_query::PointQuery;

mod point_collision_model;
mod point_collision_polytope;
#[doc(hidden)]
pub mod point_query;
