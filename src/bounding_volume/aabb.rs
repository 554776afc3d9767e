//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM, TWO_DIM};
use na;

/// An Axis-Aligned Bounding Box (AABB).
///
/// An AABB is defined by its minimum and maximum corners. Within this crate it
/// plays two roles: the bounds of a whole mesh or triangle, and the cell of a
/// KD-tree node, obtained by cutting the root bounds with the split planes
/// on the way down.
///
/// # Faces
///
/// The six faces of an AABB are addressed by an index in `0..6`. Face `2 * i`
/// is the face with the smallest coordinate along axis `i` (outward normal
/// `-e_i`), face `2 * i + 1` the one with the largest coordinate (outward
/// normal `+e_i`).
///
/// # Example
///
/// ```rust
/// use walkthrough3d::bounding_volume::Aabb;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(1.0, 2.0, 3.0),
///     Point3::new(-1.0, 4.0, 2.0),
///     Point3::new(0.0, 0.0, 5.0),
/// ];
/// let aabb = Aabb::from_points(points);
///
/// assert_eq!(aabb.mins, Point3::new(-1.0, 0.0, 2.0));
/// assert_eq!(aabb.maxs, Point3::new(1.0, 4.0, 5.0));
/// assert!(aabb.contains_local_point(&Point3::new(0.0, 1.0, 3.0)));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// The outward normal of each face, indexed as described in the type-level documentation.
    pub const FACE_NORMALS: [[Real; DIM]; TWO_DIM] = [
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, -1.0],
        [0.0, 0.0, 1.0],
    ];

    /// Creates a new AABB from its minimum and maximum corners.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` set to the largest representable value and `maxs`
    /// to the smallest one.
    ///
    /// Taking a point into it yields the degenerate AABB of that point alone.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates the smallest AABB enclosing every point of `pts`.
    ///
    /// Returns [`Aabb::new_invalid`] if `pts` is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Aabb::new_invalid();

        for pt in pts {
            result.take_point(pt);
        }

        result
    }

    /// The center of this `Aabb`.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The extents of this `Aabb`.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The half area of this `Aabb`.
    ///
    /// This is the quantity used by the surface area heuristic.
    pub fn half_area(&self) -> Real {
        let extents = self.extents();
        extents.x * (extents.y + extents.z) + extents.y * extents.z
    }

    /// Enlarges this `Aabb` so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Does this AABB contain a point expressed in the same coordinate frame as `self`?
    ///
    /// Points on the boundary are considered contained.
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Does this AABB fully contain `other`?
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    /// Do this AABB and `other` touch or overlap?
    ///
    /// Both boxes are closed: sharing a single face, edge or corner counts as an
    /// intersection. This is the rule used by the KD-tree to decide which cells reference a
    /// triangle.
    ///
    /// ```rust
    /// use walkthrough3d::bounding_volume::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let cell = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    /// let touching = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
    /// let apart = Aabb::new(Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
    ///
    /// assert!(cell.intersects(&touching));
    /// assert!(!cell.intersects(&apart));
    /// ```
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    /// Splits this AABB into two halves with the plane orthogonal to `axis` at `dist`.
    ///
    /// The first half is the one with the smallest coordinates along `axis`.
    #[inline]
    pub fn split(&self, axis: usize, dist: Real) -> (Aabb, Aabb) {
        let mut left = *self;
        let mut right = *self;
        left.maxs[axis] = dist;
        right.mins[axis] = dist;
        (left, right)
    }

    /// The coordinate, along its axis, of the face with index `face`.
    #[inline]
    pub fn face_coordinate(&self, face: usize) -> Real {
        let axis = face / 2;

        if face % 2 == 0 {
            self.mins[axis]
        } else {
            self.maxs[axis]
        }
    }

    /// Index of the face opposite to `face`.
    #[inline]
    pub fn opposite_face(face: usize) -> usize {
        face ^ 1
    }

    /// Computes the parameters of the two intersection points between a line and this AABB.
    ///
    /// The parameters are such that the points are given by `origin + dir * parameter`.
    /// Both boundaries are inclusive. Returns `None` if there is no intersection, including
    /// the case of a zero `dir` with `origin` outside of `self`.
    pub fn clip_line_parameters(
        &self,
        origin: &Point<Real>,
        dir: &Vector<Real>,
    ) -> Option<(Real, Real)> {
        let mut tmin = -Real::MAX;
        let mut tmax = Real::MAX;

        for i in 0usize..DIM {
            if dir[i] == 0.0 {
                if origin[i] < self.mins[i] || origin[i] > self.maxs[i] {
                    return None;
                }
            } else {
                let denom = 1.0 / dir[i];
                let mut inter_with_near_halfspace = (self.mins[i] - origin[i]) * denom;
                let mut inter_with_far_halfspace = (self.maxs[i] - origin[i]) * denom;

                if inter_with_near_halfspace > inter_with_far_halfspace {
                    std::mem::swap(
                        &mut inter_with_near_halfspace,
                        &mut inter_with_far_halfspace,
                    )
                }

                tmin = tmin.max(inter_with_near_halfspace);
                tmax = tmax.min(inter_with_far_halfspace);

                if tmin > tmax {
                    return None;
                }
            }
        }

        Some((tmin, tmax))
    }

    /// Computes the parameter range of the segment `[a, a + ab]` lying inside of this AABB.
    ///
    /// The returned range is a sub-range of `[0, 1]`.
    #[inline]
    pub fn clip_segment_parameters(
        &self,
        a: &Point<Real>,
        ab: &Vector<Real>,
    ) -> Option<(Real, Real)> {
        let (t0, t1) = self.clip_line_parameters(a, ab)?;
        let t0 = t0.max(0.0);
        let t1 = t1.min(1.0);

        if t0 > t1 {
            None
        } else {
            Some((t0, t1))
        }
    }

    /// Computes the parameter at which the line `origin + dir * t` leaves this AABB, as well
    /// as the index of the face it leaves through.
    ///
    /// Only the faces facing `dir` are considered so `origin` is assumed to lie inside of
    /// `self`. Returns `None` if `dir` is zero.
    pub fn exit_parameter(
        &self,
        origin: &Point<Real>,
        dir: &Vector<Real>,
    ) -> Option<(Real, usize)> {
        let mut result: Option<(Real, usize)> = None;

        for i in 0..DIM {
            let (face, coord) = if dir[i] > 0.0 {
                (2 * i + 1, self.maxs[i])
            } else if dir[i] < 0.0 {
                (2 * i, self.mins[i])
            } else {
                continue;
            };

            let t = (coord - origin[i]) / dir[i];

            if result.map(|(best, _)| t < best).unwrap_or(true) {
                result = Some((t, face));
            }
        }

        result
    }
}
