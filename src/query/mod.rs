//! Non-persistent geometric queries.
//!
//! Two families of queries are available, both provided as traits implemented by the shapes
//! of [`crate::shape`]:
//!
//! * [`query::PointQuery`](PointQuery) to test whether a point is inside a solid, and to push
//!   it out of it.
//! * [`query::RayCast`](RayCast) to find where a ray enters a solid.
//!
//! Line-of-sight tests against a triangle mesh are performed by
//! [`KdTree::trace`](crate::partitioning::KdTree::trace), which reports its result as a
//! [`TraceResult`].

pub use self::point::{PointQuery, MAX_POP_OUT_PASSES, POP_OUT_EPSILON};
pub use self::ray::{Ray, RayCast, RayIntersection, TraceResult};

pub mod point;
mod ray;

/// Queries dedicated to specific shapes.
pub mod details {
    pub use super::ray::local_ray_intersection_with_triangle;
}
