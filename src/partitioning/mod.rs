//! Spatial partitioning tools.

pub use self::kdtree::{
    KdLeaf, KdNode, KdTree, KdTreeBuildOptions, KdTreeError, KdTreeHeader, KdTreeStats,
    MAX_LEAF_TRIANGLES,
};

mod kdtree;
