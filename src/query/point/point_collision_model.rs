use crate::math::{Point, Real};
use crate::query::{PointQuery, POP_OUT_EPSILON};
use crate::shape::{CollisionModel, CollisionPolytope};
use smallvec::SmallVec;

/// The maximum number of polytopes a point is popped out of by a single call to
/// [`PointQuery::pop_out`] on a [`CollisionModel`].
pub const MAX_POP_OUT_PASSES: usize = 4;

impl CollisionModel {
    /// Pushes `pt`, which is inside `container`, out of it.
    ///
    /// The planes of `container` are tried from the shallowest to the deepest, ties in
    /// insertion order, and the first push that does not land in another polytope of `self`
    /// wins. If every push lands in solid, the shallowest one is used.
    fn pop_out_of(&self, container: &CollisionPolytope, pt: &Point<Real>) -> Point<Real> {
        let mut candidates: SmallVec<[(usize, Real); 8]> = container
            .planes
            .iter()
            .enumerate()
            .map(|(i, plane)| (i, plane.signed_distance(pt)))
            .collect();
        // Stable, so equally deep planes keep their insertion order.
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let push = |(id, dist): (usize, Real)| -> Point<Real> {
            pt + *container.planes[id].normal * (POP_OUT_EPSILON - dist)
        };

        candidates
            .iter()
            .map(|candidate| push(*candidate))
            .find(|pushed| !self.test_point(pushed))
            .unwrap_or_else(|| push(candidates[0]))
    }
}

impl PointQuery for CollisionModel {
    #[inline]
    fn test_point(&self, pt: &Point<Real>) -> bool {
        self.polytopes.iter().any(|polytope| polytope.test_point(pt))
    }

    fn pop_out(&self, pt: &mut Point<Real>) -> bool {
        let mut popped = false;

        for _ in 0..MAX_POP_OUT_PASSES {
            let Some(container) = self.polytopes.iter().find(|p| p.test_point(pt)) else {
                break;
            };

            *pt = self.pop_out_of(container, pt);
            popped = true;
        }

        popped
    }
}
