use super::{KdNode, KdTree};
use crate::bounding_volume::Aabb;
use crate::math::{DIM, TWO_DIM};
use smallvec::SmallVec;

impl KdTree {
    /// Checks that this tree is well-formed.
    ///
    /// The tree is well-formed if:
    /// - the header matches the buffers and its bounds enclose the mesh,
    /// - every node and leaf is reachable from the root exactly once,
    /// - every splitting plane lies strictly inside of its node’s cell and every leaf bounds
    ///   match the cell reached from the root,
    /// - every triangle referenced by a leaf exists and touches the leaf’s closed cell, and every
    ///   triangle of the mesh is referenced by at least one leaf,
    /// - every rope points to a node whose cell lies across the corresponding face and covers
    ///   it, and missing ropes are only found on the boundary of the tree.
    ///
    /// If `full_verify` is `true`, every pair of triangle and leaf is also checked: a leaf must
    /// reference all the triangles whose AABB intersects its closed cell. This costs
    /// `O(num_triangles * num_leaves)`.
    ///
    /// The first failed check is reported with [`log::warn!`].
    pub fn validate(&self, full_verify: bool) -> bool {
        match self.check_structure(full_verify) {
            Ok(()) => true,
            Err(msg) => {
                log::warn!("Invalid KD-tree: {}", msg);
                false
            }
        }
    }

    fn check_structure(&self, full_verify: bool) -> Result<(), String> {
        if self.header != self.compute_header() {
            return Err(format!(
                "header {:?} does not match the buffers.",
                self.header
            ));
        }

        if self.nodes.is_empty() {
            return Err("the tree has no root.".to_string());
        }

        if !self.header.bounds.contains(&self.mesh.aabb()) {
            return Err("the tree bounds do not enclose the mesh.".to_string());
        }

        let num_triangles = self.mesh.num_triangles() as usize;
        let mut node_cells: Vec<Option<Aabb>> = vec![None; self.nodes.len()];
        let mut leaf_visited = vec![false; self.leaves.len()];
        let mut triangle_covered = vec![false; num_triangles];
        let mut stack: SmallVec<[(u32, Aabb); 32]> = SmallVec::new();
        stack.push((0, self.header.bounds));

        while let Some((node_id, cell)) = stack.pop() {
            let Some(node_cell) = node_cells.get_mut(node_id as usize) else {
                return Err(format!("node {} does not exist.", node_id));
            };

            if node_cell.replace(cell).is_some() {
                return Err(format!("detected loop: node {} visited twice.", node_id));
            }

            match self.nodes[node_id as usize] {
                KdNode::Internal {
                    axis,
                    dist,
                    left,
                    right,
                } => {
                    if axis >= DIM {
                        return Err(format!("node {} splits along axis {}.", node_id, axis));
                    }

                    if !(dist > cell.mins[axis] && dist < cell.maxs[axis]) {
                        return Err(format!(
                            "node {} splits at {} outside of its cell.",
                            node_id, dist
                        ));
                    }

                    let (left_cell, right_cell) = cell.split(axis, dist);
                    stack.push((left, left_cell));
                    stack.push((right, right_cell));
                }
                KdNode::Leaf { leaf: leaf_id } => {
                    let Some(visited) = leaf_visited.get_mut(leaf_id as usize) else {
                        return Err(format!("leaf {} does not exist.", leaf_id));
                    };

                    if std::mem::replace(visited, true) {
                        return Err(format!("leaf {} is referenced twice.", leaf_id));
                    }

                    let leaf = &self.leaves[leaf_id as usize];

                    if leaf.bounds != cell {
                        return Err(format!(
                            "leaf {} bounds do not match its cell {:?}.",
                            leaf_id, cell
                        ));
                    }

                    let overflow_end = leaf.overflow_start as usize + leaf.overflow_len as usize;
                    if overflow_end > self.overflow.len() {
                        return Err(format!(
                            "leaf {} overflow range ends past the overflow buffer.",
                            leaf_id
                        ));
                    }

                    let mut referenced: SmallVec<[u32; 16]> =
                        leaf.triangles(&self.overflow).collect();
                    referenced.sort_unstable();

                    if referenced.windows(2).any(|w| w[0] == w[1]) {
                        return Err(format!("leaf {} references a triangle twice.", leaf_id));
                    }

                    for tri in referenced {
                        let Some(covered) = triangle_covered.get_mut(tri as usize) else {
                            return Err(format!(
                                "leaf {} references the triangle {} which does not exist.",
                                leaf_id, tri
                            ));
                        };

                        if !cell.intersects(&self.mesh.triangle_aabb(tri)) {
                            return Err(format!(
                                "leaf {} references the triangle {} outside of its cell.",
                                leaf_id, tri
                            ));
                        }

                        *covered = true;
                    }
                }
            }
        }

        if let Some(node_id) = node_cells.iter().position(|cell| cell.is_none()) {
            return Err(format!("node {} is not reachable from the root.", node_id));
        }

        if let Some(leaf_id) = leaf_visited.iter().position(|visited| !visited) {
            return Err(format!("leaf {} is not reachable from the root.", leaf_id));
        }

        if let Some(tri) = triangle_covered.iter().position(|covered| !covered) {
            return Err(format!("triangle {} is not referenced by any leaf.", tri));
        }

        for (leaf_id, leaf) in self.leaves.iter().enumerate() {
            for face in 0..TWO_DIM {
                self.check_rope(leaf_id, face, &node_cells)?;
            }

            if full_verify {
                let referenced: Vec<u32> = leaf.triangles(&self.overflow).collect();

                for tri in 0..self.mesh.num_triangles() {
                    if leaf.bounds.intersects(&self.mesh.triangle_aabb(tri))
                        && !referenced.contains(&tri)
                    {
                        return Err(format!(
                            "leaf {} touches the triangle {} but does not reference it.",
                            leaf_id, tri
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn check_rope(
        &self,
        leaf_id: usize,
        face: usize,
        node_cells: &[Option<Aabb>],
    ) -> Result<(), String> {
        let leaf = &self.leaves[leaf_id];
        let axis = face / 2;
        let coord = leaf.bounds.face_coordinate(face);

        let Some(rope) = leaf.ropes[face] else {
            return if coord == self.header.bounds.face_coordinate(face) {
                Ok(())
            } else {
                Err(format!(
                    "leaf {} has no rope on the inner face {}.",
                    leaf_id, face
                ))
            };
        };

        let Some(Some(target)) = node_cells.get(rope as usize) else {
            return Err(format!(
                "leaf {} rope {} points to the missing node {}.",
                leaf_id, face, rope
            ));
        };

        let across = target.face_coordinate(Aabb::opposite_face(face)) == coord;
        let covers = (0..DIM).filter(|i| *i != axis).all(|i| {
            target.mins[i] <= leaf.bounds.mins[i] && target.maxs[i] >= leaf.bounds.maxs[i]
        });

        if across && covers {
            Ok(())
        } else {
            Err(format!(
                "leaf {} rope {} points to the node {} which is not adjacent.",
                leaf_id, face, rope
            ))
        }
    }
}
