use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, UnitVector, Vector, TWO_DIM};
use crate::shape::Plane;

/// A convex solid given as the intersection of half-spaces.
///
/// Each [`Plane`] has its normal pointing out of the solid, and a point is inside the
/// polytope iff it lies strictly on the interior side of every plane. A polytope does not need
/// to be bounded: a single plane describes a whole half-space. A polytope without any plane
/// contains nothing.
///
/// The point and ray queries are provided by the [`PointQuery`](crate::query::PointQuery) and
/// [`RayCast`](crate::query::RayCast) traits.
///
/// # Example
///
/// ```rust
/// use walkthrough3d::bounding_volume::Aabb;
/// use walkthrough3d::query::PointQuery;
/// use walkthrough3d::shape::CollisionPolytope;
/// use nalgebra::Point3;
///
/// let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
/// let cube = CollisionPolytope::from_aabb("cube", &aabb);
///
/// assert_eq!(cube.planes.len(), 6);
/// assert!(cube.test_point(&Point3::origin()));
/// assert!(!cube.test_point(&Point3::new(2.0, 0.0, 0.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionPolytope {
    /// A name identifying this polytope, typically the name of the level geometry it was
    /// built from.
    pub name: String,
    /// The planes bounding this polytope.
    pub planes: Vec<Plane>,
}

impl CollisionPolytope {
    /// Creates a polytope without any plane.
    pub fn new(name: impl Into<String>) -> Self {
        CollisionPolytope {
            name: name.into(),
            planes: Vec::new(),
        }
    }

    /// Creates a polytope bounded by the given planes.
    pub fn from_planes(name: impl Into<String>, planes: Vec<Plane>) -> Self {
        CollisionPolytope {
            name: name.into(),
            planes,
        }
    }

    /// Creates the polytope with the same interior as `aabb`.
    ///
    /// The planes follow the face ordering of [`Aabb`].
    pub fn from_aabb(name: impl Into<String>, aabb: &Aabb) -> Self {
        let planes = (0..TWO_DIM)
            .map(|face| {
                let normal = UnitVector::new_unchecked(Vector::from(Aabb::FACE_NORMALS[face]));
                let coord = aabb.face_coordinate(face);
                // The face normals are axis-aligned, so `normal · p` is `±p[axis]`.
                let dist = if face % 2 == 0 { coord } else { -coord };
                Plane::new(normal, dist)
            })
            .collect();

        Self::from_planes(name, planes)
    }

    /// Appends a bounding plane to this polytope.
    ///
    /// Planes are neither deduplicated nor limited in number.
    #[inline]
    pub fn add(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    /// The plane this polytope is the least deep behind at `point`, with its signed distance.
    ///
    /// This is the plane with the largest signed distance; ties resolve to the first such
    /// plane in insertion order. Returns `None` if the polytope has no plane.
    pub(crate) fn shallowest_plane(&self, point: &Point<Real>) -> Option<(usize, Real)> {
        let mut best: Option<(usize, Real)> = None;

        for (i, plane) in self.planes.iter().enumerate() {
            let dist = plane.signed_distance(point);

            if best.map(|(_, best_dist)| dist > best_dist).unwrap_or(true) {
                best = Some((i, dist));
            }
        }

        best
    }
}
