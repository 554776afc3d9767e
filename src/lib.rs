/*!
walkthrough3d
=============

**walkthrough3d** is a small 3-dimensional geometric library for scene
walkthroughs written with the rust programming language.

It provides two independent pieces:

* A static [`KdTree`](partitioning::KdTree) over a triangle mesh, with
  closest-hit segment tracing that walks from leaf to leaf through ropes
  instead of re-descending from the root.
* Convex [`CollisionPolytope`](shape::CollisionPolytope)s aggregated into a
  [`CollisionModel`](shape::CollisionModel), and the
  [`slide_move`](control::slide_move) locomotion routine built on top of them.

All structures are immutable once built and can be queried from several
threads at once.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]
#![deny(unused_qualifications)]

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[cfg_attr(test, macro_use)]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod control;
pub mod partitioning;
pub mod query;
pub mod shape;

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use na::{Point2, Point3, UnitVector3, Vector2, Vector3};

    /// The scalar type used throughout this crate.
    pub use f32 as Real;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The dimension of the space multiplied by two.
    ///
    /// This is also the number of faces of an axis-aligned box.
    pub const TWO_DIM: usize = DIM * 2;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The texture coordinate type.
    pub type TexCoord<N> = Point2<N>;
}
