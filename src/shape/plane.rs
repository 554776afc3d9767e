//! Oriented plane bounding a half-space.
use crate::math::{Point, Real, UnitVector, Vector};

/// A plane with a unit normal, bounding the solid half-space it faces away from.
///
/// The signed distance of a point `p` to the plane is `normal · p + dist`. The normal points
/// out of the solid: points with a negative signed distance are on the interior side of the
/// plane, points with a positive signed distance are on its exterior side.
///
/// # Example
///
/// ```rust
/// use walkthrough3d::shape::Plane;
/// use nalgebra::{Point3, Vector3};
///
/// // The floor of a room: solid below y = 0.
/// let floor = Plane::from_point_and_normal(&Point3::origin(), Vector3::y_axis());
///
/// assert_eq!(floor.signed_distance(&Point3::new(3.0, 2.0, 0.0)), 2.0);
/// assert!(floor.signed_distance(&Point3::new(0.0, -1.0, 0.0)) < 0.0);
/// ```
#[derive(PartialEq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Plane {
    /// The outward unit normal of the plane.
    pub normal: UnitVector<Real>,
    /// The signed offset of the plane, so that `normal · p + dist = 0` on the plane.
    pub dist: Real,
}

impl Plane {
    /// Creates a plane from its unit normal and offset.
    #[inline]
    pub fn new(normal: UnitVector<Real>, dist: Real) -> Plane {
        Plane { normal, dist }
    }

    /// Creates a plane from a normal that is not necessarily normalized.
    ///
    /// Both `normal` and `dist` are scaled so that the normal has a unit length, which keeps
    /// the plane unchanged. Returns `None` if `normal` is zero (or not finite), since such a
    /// plane bounds nothing.
    pub fn try_new(normal: Vector<Real>, dist: Real) -> Option<Plane> {
        let (normal, norm) = UnitVector::try_new_and_get(normal, 0.0)?;

        if !norm.is_finite() || !dist.is_finite() {
            return None;
        }

        Some(Plane::new(normal, dist / norm))
    }

    /// Creates the plane passing through `point` with the outward normal `normal`.
    #[inline]
    pub fn from_point_and_normal(point: &Point<Real>, normal: UnitVector<Real>) -> Plane {
        Plane::new(normal, -normal.dot(&point.coords))
    }

    /// The signed distance from `point` to this plane, negative on the interior side.
    #[inline]
    pub fn signed_distance(&self, point: &Point<Real>) -> Real {
        self.normal.dot(&point.coords) + self.dist
    }

    /// The orthogonal projection of `point` on this plane.
    #[inline]
    pub fn project_point(&self, point: &Point<Real>) -> Point<Real> {
        point - *self.normal * self.signed_distance(point)
    }

    /// This plane with its interior and exterior sides swapped.
    #[inline]
    pub fn flipped(&self) -> Plane {
        Plane::new(-self.normal, -self.dist)
    }
}
