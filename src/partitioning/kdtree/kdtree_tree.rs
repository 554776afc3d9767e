use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, TexCoord, TWO_DIM};
use crate::shape::{TriMesh, TriMeshBuilderError};
use arrayvec::ArrayVec;

/// The number of triangle indices stored inline by a [`KdLeaf`].
///
/// Leaves referencing more triangles store the excess in the tree’s overflow buffer.
pub const MAX_LEAF_TRIANGLES: usize = 4;

/// Error while building or adopting a [`KdTree`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum KdTreeError {
    /// The input mesh is malformed.
    #[error(transparent)]
    Mesh(#[from] TriMeshBuilderError),
    /// The nodes, leaves, ropes or overflow buffer are inconsistent with each other or with
    /// the mesh.
    #[error("the KD-tree structure is inconsistent with its mesh.")]
    InvalidStructure,
}

/// Summary of the buffers of a [`KdTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KdTreeHeader {
    /// The number of vertices of the mesh.
    pub num_vertices: u32,
    /// The number of texture coordinates of the mesh.
    pub num_uvs: u32,
    /// The number of indices of the mesh, i.e., three times its triangle count.
    pub num_indices: u32,
    /// The number of nodes of the tree.
    pub num_nodes: u32,
    /// The number of leaves of the tree.
    pub num_leaves: u32,
    /// The number of entries of the overflow buffer.
    pub num_overflow: u32,
    /// The AABB enclosing the whole mesh, which is also the cell of the root node.
    pub bounds: Aabb,
}

/// A node of a [`KdTree`].
///
/// The root of the tree is the node at index 0.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KdNode {
    /// A node splitting its cell in two with an axis-aligned plane.
    Internal {
        /// The axis orthogonal to the splitting plane.
        axis: usize,
        /// The coordinate of the splitting plane along `axis`.
        dist: Real,
        /// The node covering the part of the cell with coordinates smaller than `dist`.
        left: u32,
        /// The node covering the part of the cell with coordinates greater than `dist`.
        right: u32,
    },
    /// A node without children, referencing an entry of the tree’s leaves.
    Leaf {
        /// Index of the leaf in [`KdTree::leaves`].
        leaf: u32,
    },
}

/// A cell of a [`KdTree`] with the triangles overlapping it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KdLeaf {
    /// The first triangles referenced by this leaf.
    pub triangles: ArrayVec<u32, MAX_LEAF_TRIANGLES>,
    /// Start of the remaining triangles in the tree’s overflow buffer.
    pub overflow_start: u32,
    /// The number of triangles stored in the tree’s overflow buffer.
    pub overflow_len: u32,
    /// For each face of `bounds`, the node on the other side of that face.
    ///
    /// Faces are numbered as in [`Aabb::FACE_NORMALS`]. A face lying on the boundary of the
    /// whole tree has no rope.
    pub ropes: [Option<u32>; TWO_DIM],
    /// The cell of this leaf.
    pub bounds: Aabb,
}

impl KdLeaf {
    /// The total number of triangles referenced by this leaf.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() + self.overflow_len as usize
    }

    /// The triangles referenced by this leaf, inline ones first.
    pub fn triangles<'a>(&'a self, overflow: &'a [u32]) -> impl Iterator<Item = u32> + 'a {
        let start = self.overflow_start as usize;
        let end = start + self.overflow_len as usize;
        let spilled = overflow.get(start..end).unwrap_or(&[]);
        self.triangles.iter().chain(spilled.iter()).copied()
    }
}

/// A static KD-tree over the triangles of a mesh, for segment tracing.
///
/// Every leaf stores one rope per face of its cell: the index of the node on the other side of
/// that face. Traces first descend from the root to the leaf containing the entry point of the
/// segment, and then follow ropes from leaf to leaf until the closest hit is found.
///
/// The tree is built once from a [`TriMesh`] and is read-only afterward.
///
/// # Example
///
/// ```rust
/// use walkthrough3d::partitioning::KdTree;
/// use walkthrough3d::shape::TriMesh;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(-1.0, -1.0, 0.0),
///     Point3::new(1.0, -1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = TriMesh::new(vertices, vec![], vec![[0, 1, 2]]).unwrap();
/// let tree = KdTree::new(mesh);
///
/// let hit = tree.trace(&Point3::new(0.0, 0.0, -1.0), &Point3::new(0.0, 0.0, 1.0));
/// assert_eq!(hit.triangle, Some(0));
/// assert_eq!(hit.fraction, 0.5);
/// assert!(tree.validate(true));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "KdTreeParts")
)]
pub struct KdTree {
    pub(super) header: KdTreeHeader,
    pub(super) mesh: TriMesh,
    pub(super) nodes: Vec<KdNode>,
    pub(super) leaves: Vec<KdLeaf>,
    pub(super) overflow: Vec<u32>,
}

/// The parts of a serialized [`KdTree`], adopted through [`KdTree::from_raw_parts`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct KdTreeParts {
    header: KdTreeHeader,
    mesh: TriMesh,
    nodes: Vec<KdNode>,
    leaves: Vec<KdLeaf>,
    overflow: Vec<u32>,
}

#[cfg(feature = "serde")]
impl TryFrom<KdTreeParts> for KdTree {
    type Error = KdTreeError;

    fn try_from(parts: KdTreeParts) -> Result<Self, Self::Error> {
        KdTree::from_raw_parts(
            parts.header,
            parts.mesh,
            parts.nodes,
            parts.leaves,
            parts.overflow,
        )
    }
}

impl KdTree {
    /// Builds a tree from vertex, texture coordinate, and flat index buffers.
    pub fn from_buffers(
        vertices: Vec<Point<Real>>,
        uvs: Vec<TexCoord<Real>>,
        indices: &[u32],
    ) -> Result<Self, KdTreeError> {
        let mesh = TriMesh::from_flat_indices(vertices, uvs, indices)?;
        Ok(Self::new(mesh))
    }

    /// Adopts a tree built beforehand, for example one deserialized from disk.
    ///
    /// The parts are checked with [`KdTree::validate`] (without the full cross-check) and
    /// rejected if they are inconsistent.
    pub fn from_raw_parts(
        header: KdTreeHeader,
        mesh: TriMesh,
        nodes: Vec<KdNode>,
        leaves: Vec<KdLeaf>,
        overflow: Vec<u32>,
    ) -> Result<Self, KdTreeError> {
        let tree = KdTree {
            header,
            mesh,
            nodes,
            leaves,
            overflow,
        };

        if tree.validate(false) {
            Ok(tree)
        } else {
            Err(KdTreeError::InvalidStructure)
        }
    }

    /// Splits this tree into its parts, as accepted by [`KdTree::from_raw_parts`].
    pub fn into_raw_parts(self) -> (KdTreeHeader, TriMesh, Vec<KdNode>, Vec<KdLeaf>, Vec<u32>) {
        (
            self.header,
            self.mesh,
            self.nodes,
            self.leaves,
            self.overflow,
        )
    }

    /// The header of this tree.
    #[inline]
    pub fn header(&self) -> &KdTreeHeader {
        &self.header
    }

    /// The mesh indexed by this tree.
    #[inline]
    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    /// The nodes of this tree. The root is at index 0.
    #[inline]
    pub fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }

    /// The leaves of this tree.
    #[inline]
    pub fn leaves(&self) -> &[KdLeaf] {
        &self.leaves
    }

    /// The triangles that did not fit inline in their leaves.
    #[inline]
    pub fn overflow(&self) -> &[u32] {
        &self.overflow
    }

    /// The AABB of the whole mesh.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.header.bounds
    }

    /// The header matching the current buffers.
    pub(super) fn compute_header(&self) -> KdTreeHeader {
        KdTreeHeader {
            num_vertices: self.mesh.vertices().len() as u32,
            num_uvs: self.mesh.uvs().len() as u32,
            num_indices: self.mesh.num_triangles() * 3,
            num_nodes: self.nodes.len() as u32,
            num_leaves: self.leaves.len() as u32,
            num_overflow: self.overflow.len() as u32,
            bounds: self.header.bounds,
        }
    }
}
