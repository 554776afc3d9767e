pub use kdtree_binned_build::KdTreeBuildOptions;
pub use kdtree_stats::KdTreeStats;
pub use kdtree_tree::{KdLeaf, KdNode, KdTree, KdTreeError, KdTreeHeader, MAX_LEAF_TRIANGLES};

mod kdtree_binned_build;
mod kdtree_stats;
mod kdtree_traverse;
mod kdtree_tree;
mod kdtree_validation;
