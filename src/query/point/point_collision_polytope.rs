use crate::math::{Point, Real};
use crate::query::PointQuery;
use crate::shape::CollisionPolytope;

/// The distance by which [`PointQuery::pop_out`] places points beyond the plane they are
/// pushed through.
///
/// Points exactly on a plane are already outside, but leaving this margin keeps them outside
/// after the rounding of later computations.
pub const POP_OUT_EPSILON: Real = 1.0e-3;

impl PointQuery for CollisionPolytope {
    #[inline]
    fn test_point(&self, pt: &Point<Real>) -> bool {
        !self.planes.is_empty()
            && self
                .planes
                .iter()
                .all(|plane| plane.signed_distance(pt) < 0.0)
    }

    fn pop_out(&self, pt: &mut Point<Real>) -> bool {
        if !self.test_point(pt) {
            return false;
        }

        // The point is behind every plane, so the shallowest one gives the smallest push.
        match self.shallowest_plane(pt) {
            Some((id, dist)) => {
                *pt += *self.planes[id].normal * (POP_OUT_EPSILON - dist);
                true
            }
            None => false,
        }
    }
}
