//! Traits and structure needed to cast rays.

use crate::math::{Point, Real, TexCoord, Vector};
use crate::shape::Plane;

/// A ray for ray-casting queries.
///
/// Points along the ray are given by `origin + dir * t`. The direction does not need to be
/// normalized, but the parameters `t` reported by queries are expressed in multiples of
/// `dir.norm()`. Segment traces use `dir = end - start` so that `t` is a fraction of the
/// segment, while collision queries use a unit `dir` so that `t` is a distance.
///
/// # Example
///
/// ```rust
/// use walkthrough3d::query::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::from_segment(Point3::new(1.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0));
///
/// assert_eq!(ray.dir, Vector3::new(2.0, 0.0, 0.0));
/// assert_eq!(ray.point_at(0.5), Point3::new(2.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction vector of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray from an origin point and direction vector.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Creates the ray going from `start` at `t = 0` to `end` at `t = 1`.
    pub fn from_segment(start: Point<Real>, end: Point<Real>) -> Ray {
        Ray::new(start, end - start)
    }

    /// Computes the point `origin + dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// Result of a ray entering a solid.
///
/// Solids are bounded by planes; the intersection reports the one the ray enters through.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RayIntersection {
    /// The parameter `t` where the ray enters the solid.
    ///
    /// With a unit ray direction this is the distance travelled before entering.
    pub time_of_impact: Real,
    /// The boundary plane of the solid crossed at `time_of_impact`.
    pub plane: Plane,
}

impl RayIntersection {
    /// Creates a new `RayIntersection`.
    #[inline]
    pub fn new(time_of_impact: Real, plane: Plane) -> RayIntersection {
        RayIntersection {
            time_of_impact,
            plane,
        }
    }
}

/// Traits of solids which can be tested for intersection with a ray.
pub trait RayCast {
    /// Casts `ray` against `self` and returns where it enters the solid, if it does so before
    /// `max_time_of_impact`.
    ///
    /// A ray starting inside the solid does not enter it and returns `None`.
    fn test_ray(&self, ray: &Ray, max_time_of_impact: Real) -> Option<RayIntersection>;

    /// Clips `length` to the parameter where `ray` enters the solid.
    ///
    /// Returns `true` if the ray enters the solid before `length`, in which case `length` is
    /// shortened. Otherwise `length` is left untouched.
    fn clip_ray(&self, ray: &Ray, length: &mut Real) -> bool {
        match self.test_ray(ray, *length) {
            Some(hit) => {
                *length = hit.time_of_impact;
                true
            }
            None => false,
        }
    }

}

/// The result of tracing a segment through a triangle mesh.
///
/// When nothing is hit, `triangle` is `None`, `fraction` is `1.0` and `uv` and `normal` are
/// zero.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceResult {
    /// Index of the triangle hit first.
    pub triangle: Option<u32>,
    /// Position of the hit along the traced segment, in `[0, 1]`.
    pub fraction: Real,
    /// The texture coordinates interpolated at the hit point.
    pub uv: TexCoord<Real>,
    /// The unit normal of the hit triangle, following its winding.
    pub normal: Vector<Real>,
}

impl TraceResult {
    /// The result of a trace that did not hit anything.
    #[inline]
    pub fn miss() -> Self {
        TraceResult {
            triangle: None,
            fraction: 1.0,
            uv: TexCoord::origin(),
            normal: Vector::zeros(),
        }
    }

    /// Did the trace hit a triangle?
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.triangle.is_some()
    }
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::miss()
    }
}
