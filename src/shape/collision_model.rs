use crate::shape::CollisionPolytope;

/// A solid made of the union of convex polytopes.
///
/// A point is inside the model iff it is inside any of its polytopes. Scenes typically hold
/// two models: one for walls, tested at foot level, and one for the ground, tested from eye
/// level (see [`slide_move`](crate::control::slide_move)).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionModel {
    /// The polytopes forming this model, in query order.
    pub polytopes: Vec<CollisionPolytope>,
}

impl CollisionModel {
    /// Creates a model without any polytope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a polytope to this model.
    #[inline]
    pub fn push(&mut self, polytope: CollisionPolytope) {
        self.polytopes.push(polytope);
    }

    /// The polytopes of this model.
    #[inline]
    pub fn polytopes(&self) -> &[CollisionPolytope] {
        &self.polytopes
    }

    /// The number of polytopes of this model.
    #[inline]
    pub fn len(&self) -> usize {
        self.polytopes.len()
    }

    /// Does this model have no polytope?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polytopes.is_empty()
    }
}

impl FromIterator<CollisionPolytope> for CollisionModel {
    fn from_iter<I: IntoIterator<Item = CollisionPolytope>>(iter: I) -> Self {
        CollisionModel {
            polytopes: iter.into_iter().collect(),
        }
    }
}

impl Extend<CollisionPolytope> for CollisionModel {
    fn extend<I: IntoIterator<Item = CollisionPolytope>>(&mut self, iter: I) {
        self.polytopes.extend(iter)
    }
}
