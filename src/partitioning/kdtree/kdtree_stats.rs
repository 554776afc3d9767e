use super::{KdNode, KdTree};
use crate::math::Real;
use smallvec::SmallVec;

/// Shape statistics of a [`KdTree`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct KdTreeStats {
    /// The number of triangles of the mesh.
    pub num_triangles: u32,
    /// The number of nodes, leaves included.
    pub num_nodes: u32,
    /// The number of leaves.
    pub num_leaves: u32,
    /// The number of leaves without any triangle.
    pub num_empty_leaves: u32,
    /// The number of triangle references stored in the overflow buffer.
    pub num_overflow: u32,
    /// The total number of triangle references of all the leaves.
    pub num_triangle_references: u32,
    /// The largest number of triangles referenced by a single leaf.
    pub max_leaf_triangles: u32,
    /// The depth of the deepest leaf, the root being at depth 0.
    pub max_depth: u32,
    /// The average number of triangles referenced by non-empty leaves.
    pub average_leaf_triangles: Real,
}

impl KdTree {
    /// Computes statistics describing the shape of this tree.
    pub fn stats(&self) -> KdTreeStats {
        let mut stats = KdTreeStats {
            num_triangles: self.mesh.num_triangles(),
            num_nodes: self.nodes.len() as u32,
            num_leaves: self.leaves.len() as u32,
            num_overflow: self.overflow.len() as u32,
            ..KdTreeStats::default()
        };

        for leaf in &self.leaves {
            let num_triangles = leaf.num_triangles() as u32;
            stats.num_triangle_references += num_triangles;
            stats.max_leaf_triangles = stats.max_leaf_triangles.max(num_triangles);
            stats.num_empty_leaves += (num_triangles == 0) as u32;
        }

        let num_filled_leaves = stats.num_leaves - stats.num_empty_leaves;
        if num_filled_leaves > 0 {
            stats.average_leaf_triangles =
                stats.num_triangle_references as Real / num_filled_leaves as Real;
        }

        let mut stack: SmallVec<[(u32, u32); 32]> = SmallVec::new();
        stack.push((0, 0));

        // Bounded by the node count so a malformed tree cannot loop forever.
        let mut budget = self.nodes.len();
        while let Some((node_id, depth)) = stack.pop() {
            if budget == 0 {
                break;
            }
            budget -= 1;

            match self.nodes.get(node_id as usize) {
                Some(KdNode::Internal { left, right, .. }) => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Some(KdNode::Leaf { .. }) => stats.max_depth = stats.max_depth.max(depth),
                None => {}
            }
        }

        stats
    }

    /// Logs the statistics of this tree with [`log::info!`].
    pub fn print_stats_to_log(&self) {
        let stats = self.stats();
        let bounds = &self.header.bounds;

        log::info!(
            "KD-tree: {} vertices, {} uvs, {} triangles",
            self.header.num_vertices,
            self.header.num_uvs,
            stats.num_triangles
        );
        log::info!(
            "KD-tree: bounds [{}, {}, {}] - [{}, {}, {}]",
            bounds.mins.x,
            bounds.mins.y,
            bounds.mins.z,
            bounds.maxs.x,
            bounds.maxs.y,
            bounds.maxs.z
        );
        log::info!(
            "KD-tree: {} nodes, {} leaves ({} empty), max depth {}",
            stats.num_nodes,
            stats.num_leaves,
            stats.num_empty_leaves,
            stats.max_depth
        );
        log::info!(
            "KD-tree: {} triangle references, {} overflowed, {} per leaf on average, {} at most",
            stats.num_triangle_references,
            stats.num_overflow,
            stats.average_leaf_triangles,
            stats.max_leaf_triangles
        );
    }
}
