use super::{KdNode, KdTree};
use crate::math::{Point, Real, Vector};

impl KdTree {
    /// Descends from the node `node_id` to the leaf whose cell contains `point`.
    ///
    /// A point lying exactly on a splitting plane goes to the side `dir` points to, or to the
    /// right side if `dir` is zero along the split axis. Returns `None` if an invalid node
    /// index is met or if the descent does not terminate.
    pub(crate) fn descend(
        &self,
        mut node_id: u32,
        point: &Point<Real>,
        dir: &Vector<Real>,
    ) -> Option<u32> {
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(node_id as usize)? {
                KdNode::Leaf { leaf } => return Some(*leaf),
                KdNode::Internal {
                    axis,
                    dist,
                    left,
                    right,
                } => {
                    let coord = point[*axis];
                    let go_left = coord < *dist || (coord == *dist && dir[*axis] < 0.0);
                    node_id = if go_left { *left } else { *right };
                }
            }
        }

        None
    }

    /// The index of the leaf whose cell contains `point`.
    ///
    /// Returns `None` if `point` is outside of the bounds of the tree.
    pub fn locate_leaf(&self, point: &Point<Real>) -> Option<u32> {
        if !self.header.bounds.contains_local_point(point) {
            return None;
        }

        self.descend(0, point, &Vector::zeros())
    }

    /// The triangles referenced by the leaf containing `point`.
    ///
    /// This is a superset of the triangles with a part inside of that leaf’s cell, and is
    /// empty if `point` is outside of the bounds of the tree.
    pub fn triangles_at_point(&self, point: &Point<Real>) -> impl Iterator<Item = u32> + '_ {
        self.locate_leaf(point)
            .and_then(|leaf| self.leaves.get(leaf as usize))
            .into_iter()
            .flat_map(move |leaf| leaf.triangles(&self.overflow))
    }
}
