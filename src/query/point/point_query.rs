use crate::math::{Point, Real};

/// Trait of solids which can be tested for point inclusion and push points out of themselves.
pub trait PointQuery {
    /// Tests if the given point is inside of `self`.
    ///
    /// Points lying exactly on the boundary are outside.
    fn test_point(&self, pt: &Point<Real>) -> bool;

    /// Moves `pt` to the nearest point outside of `self` if it is inside.
    ///
    /// Returns `true` if `pt` was moved. A point already outside is left untouched, so
    /// calling this twice in a row is the same as calling it once.
    fn pop_out(&self, pt: &mut Point<Real>) -> bool;

    /// The result of [`PointQuery::pop_out`] applied to a copy of `pt`.
    fn popped_out(&self, pt: &Point<Real>) -> Point<Real> {
        let mut result = *pt;
        let _ = self.pop_out(&mut result);
        result
    }
}
