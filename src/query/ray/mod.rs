//! Ray-casting related definitions and implementations.

#[doc(inline)]
pub use self::ray::{Ray, RayCast, RayIntersection, TraceResult};
pub use self::ray_triangle::local_ray_intersection_with_triangle;

#[doc(hidden)]
pub mod ray;
mod ray_collision_model;
mod ray_collision_polytope;
mod ray_kdtree;
mod ray_triangle;
