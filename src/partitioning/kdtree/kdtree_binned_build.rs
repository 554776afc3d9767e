use super::{KdLeaf, KdNode, KdTree, KdTreeHeader, MAX_LEAF_TRIANGLES};
use crate::bounding_volume::Aabb;
use crate::math::{Real, DIM, TWO_DIM};
use crate::shape::TriMesh;
use arrayvec::ArrayVec;
use ordered_float::OrderedFloat;

/// Parameters of the construction of a [`KdTree`].
///
/// Splitting planes are chosen with the surface area heuristic (SAH), evaluated on
/// `num_bins - 1` evenly spaced candidate planes along each axis of the cell being split.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KdTreeBuildOptions {
    /// The maximum depth of the tree.
    ///
    /// If `None`, the depth is limited to `8 + 1.3 * log2(num_triangles)`.
    pub max_depth: Option<u32>,
    /// Cells with at most this many triangles are never split.
    pub leaf_size: usize,
    /// The number of bins the cells are divided in along each axis when looking for a split.
    pub num_bins: usize,
    /// The estimated cost of visiting an internal node during a trace.
    pub traversal_cost: Real,
    /// The estimated cost of intersecting a segment with one triangle.
    pub intersection_cost: Real,
}

impl Default for KdTreeBuildOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            leaf_size: MAX_LEAF_TRIANGLES,
            num_bins: 16,
            traversal_cost: 1.0,
            intersection_cost: 1.5,
        }
    }
}

impl KdTreeBuildOptions {
    /// The depth limit applied to a tree built over `num_triangles` triangles.
    pub fn depth_limit(&self, num_triangles: u32) -> u32 {
        self.max_depth.unwrap_or_else(|| {
            let n = num_triangles.max(1) as Real;
            (8.0 + 1.3 * n.log2()).round() as u32
        })
    }
}

impl KdTree {
    /// Builds a tree over the triangles of `mesh` with the default build options.
    pub fn new(mesh: TriMesh) -> Self {
        Self::with_options(mesh, &KdTreeBuildOptions::default())
    }

    /// Builds a tree over the triangles of `mesh`.
    ///
    /// The root cell is the AABB of the mesh. Every triangle is referenced by each leaf whose
    /// closed cell intersects the triangle’s AABB (see [`Aabb::intersects`]). A triangle
    /// crossing or merely touching a splitting plane is thus referenced on both sides, and a
    /// segment running along a cell face finds every triangle it can hit on that face.
    pub fn with_options(mesh: TriMesh, options: &KdTreeBuildOptions) -> Self {
        let bounds = mesh.aabb();
        let num_triangles = mesh.num_triangles();
        let mut builder = KdTreeBuilder {
            options,
            max_depth: options.depth_limit(num_triangles),
            triangle_aabbs: (0..num_triangles).map(|i| mesh.triangle_aabb(i)).collect(),
            nodes: vec![],
            leaves: vec![],
            overflow: vec![],
        };

        let root = builder.build_node(bounds, (0..num_triangles).collect(), 0);
        debug_assert_eq!(root, 0);
        builder.build_ropes(root, bounds, [None; TWO_DIM]);

        let mut tree = KdTree {
            header: KdTreeHeader {
                num_vertices: 0,
                num_uvs: 0,
                num_indices: 0,
                num_nodes: 0,
                num_leaves: 0,
                num_overflow: 0,
                bounds,
            },
            mesh,
            nodes: builder.nodes,
            leaves: builder.leaves,
            overflow: builder.overflow,
        };
        tree.header = tree.compute_header();

        log::debug!(
            "Built KD-tree over {} triangles: {} nodes, {} leaves, {} overflow entries, depth limit {}.",
            num_triangles,
            tree.header.num_nodes,
            tree.header.num_leaves,
            tree.header.num_overflow,
            builder.max_depth
        );

        tree
    }
}

struct KdTreeBuilder<'a> {
    options: &'a KdTreeBuildOptions,
    max_depth: u32,
    triangle_aabbs: Vec<Aabb>,
    nodes: Vec<KdNode>,
    leaves: Vec<KdLeaf>,
    overflow: Vec<u32>,
}

impl KdTreeBuilder<'_> {
    fn build_node(&mut self, cell: Aabb, triangles: Vec<u32>, depth: u32) -> u32 {
        let node_id = self.nodes.len() as u32;
        // Placeholder, overwritten once the children are known.
        self.nodes.push(KdNode::Leaf { leaf: u32::MAX });

        let node = match self.find_split(&cell, &triangles, depth) {
            Some((axis, dist)) => {
                let (left_cell, right_cell) = cell.split(axis, dist);
                let left_triangles = self.triangles_overlapping(&left_cell, &triangles);
                let right_triangles = self.triangles_overlapping(&right_cell, &triangles);
                drop(triangles);

                let left = self.build_node(left_cell, left_triangles, depth + 1);
                let right = self.build_node(right_cell, right_triangles, depth + 1);
                KdNode::Internal {
                    axis,
                    dist,
                    left,
                    right,
                }
            }
            None => KdNode::Leaf {
                leaf: self.push_leaf(cell, &triangles),
            },
        };

        self.nodes[node_id as usize] = node;
        node_id
    }

    fn triangles_overlapping(&self, cell: &Aabb, triangles: &[u32]) -> Vec<u32> {
        triangles
            .iter()
            .copied()
            .filter(|tri| cell.intersects(&self.triangle_aabbs[*tri as usize]))
            .collect()
    }

    /// Selects the splitting plane with the smallest SAH cost, if it beats keeping `cell` as
    /// a leaf.
    fn find_split(&self, cell: &Aabb, triangles: &[u32], depth: u32) -> Option<(usize, Real)> {
        let num_triangles = triangles.len();
        let area = cell.half_area();

        if num_triangles <= self.options.leaf_size || depth >= self.max_depth || area <= 0.0 {
            return None;
        }

        let num_bins = self.options.num_bins;
        let leaf_cost = self.options.intersection_cost * num_triangles as Real;

        let (best_cost, axis, dist) = (0..DIM)
            .flat_map(|axis| (1..num_bins).map(move |bin| (axis, bin)))
            .filter_map(|(axis, bin)| {
                let (lo, hi) = (cell.mins[axis], cell.maxs[axis]);
                let dist = lo + (hi - lo) * bin as Real / num_bins as Real;

                // Splitting planes must lie strictly inside of the cell.
                if !(dist > lo && dist < hi) {
                    return None;
                }

                let (left, right) = cell.split(axis, dist);
                let mut num_left = 0;
                let mut num_right = 0;

                for tri in triangles {
                    let aabb = &self.triangle_aabbs[*tri as usize];
                    num_left += left.intersects(aabb) as usize;
                    num_right += right.intersects(aabb) as usize;
                }

                if num_left == num_triangles && num_right == num_triangles {
                    return None;
                }

                let cost = self.options.traversal_cost
                    + self.options.intersection_cost
                        * (left.half_area() * num_left as Real
                            + right.half_area() * num_right as Real)
                        / area;
                Some((cost, axis, dist))
            })
            .min_by_key(|(cost, _, _)| OrderedFloat(*cost))?;

        (best_cost < leaf_cost).then_some((axis, dist))
    }

    fn push_leaf(&mut self, cell: Aabb, triangles: &[u32]) -> u32 {
        let mut leaf = KdLeaf {
            triangles: ArrayVec::new(),
            overflow_start: self.overflow.len() as u32,
            overflow_len: 0,
            ropes: [None; TWO_DIM],
            bounds: cell,
        };

        for tri in triangles {
            if let Err(err) = leaf.triangles.try_push(*tri) {
                self.overflow.push(err.element());
                leaf.overflow_len += 1;
            }
        }

        self.leaves.push(leaf);
        self.leaves.len() as u32 - 1
    }

    /// Assigns the ropes of every leaf of the subtree rooted at `node_id`, given the ropes of
    /// its cell.
    fn build_ropes(&mut self, node_id: u32, cell: Aabb, mut ropes: [Option<u32>; TWO_DIM]) {
        for (face, rope) in ropes.iter_mut().enumerate() {
            *rope = self.optimize_rope(*rope, face, &cell);
        }

        match self.nodes[node_id as usize] {
            KdNode::Leaf { leaf } => self.leaves[leaf as usize].ropes = ropes,
            KdNode::Internal {
                axis,
                dist,
                left,
                right,
            } => {
                let (left_cell, right_cell) = cell.split(axis, dist);
                let mut left_ropes = ropes;
                let mut right_ropes = ropes;
                left_ropes[2 * axis + 1] = Some(right);
                right_ropes[2 * axis] = Some(left);

                self.build_ropes(left, left_cell, left_ropes);
                self.build_ropes(right, right_cell, right_ropes);
            }
        }
    }

    /// Moves a rope down the tree for as long as a single child still covers the whole face.
    fn optimize_rope(&self, mut rope: Option<u32>, face: usize, cell: &Aabb) -> Option<u32> {
        let face_axis = face / 2;

        while let Some(node_id) = rope {
            match self.nodes[node_id as usize] {
                KdNode::Leaf { .. } => break,
                KdNode::Internal {
                    axis,
                    dist,
                    left,
                    right,
                } => {
                    if axis == face_axis {
                        // Take the child touching the face.
                        rope = Some(if face % 2 == 1 { left } else { right });
                    } else if dist <= cell.mins[axis] {
                        rope = Some(right);
                    } else if dist >= cell.maxs[axis] {
                        rope = Some(left);
                    } else {
                        break;
                    }
                }
            }
        }

        rope
    }
}
