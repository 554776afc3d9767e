use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, TexCoord, Vector};

/// Indicated an inconsistency while building a triangle mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriMeshBuilderError {
    /// A triangle mesh must contain at least one triangle.
    #[error("A triangle mesh must contain at least one triangle.")]
    EmptyIndices,
    /// A flat index buffer must contain three indices per triangle.
    #[error("the index buffer has {0} elements, which is not a multiple of three.")]
    IndexCountNotMultipleOfThree(usize),
    /// A triangle references a vertex that does not exist.
    #[error("the triangle {triangle} references the vertex {vertex} which does not exist.")]
    DanglingIndex {
        /// The triangle with the invalid reference.
        triangle: u32,
        /// The out-of-bounds vertex index.
        vertex: u32,
    },
    /// The texture coordinates must be either absent or given for every vertex.
    #[error("the mesh has {vertices} vertices but {uvs} texture coordinates.")]
    UvCountMismatch {
        /// The number of vertices.
        vertices: usize,
        /// The number of texture coordinates.
        uvs: usize,
    },
    /// A vertex has a NaN or infinite coordinate.
    #[error("the vertex {0} has a non-finite coordinate.")]
    NonFiniteVertex(u32),
    /// A triangle has a zero area, so it has no normal.
    #[error("the triangle {0} is degenerate.")]
    DegenerateTriangle(u32),
}

/// A triangle mesh with optional per-vertex texture coordinates.
///
/// The mesh is checked on construction: every triangle references existing vertices, has a
/// non-zero area, and the texture coordinates (if any) match the vertices one to one. Once
/// built, it cannot be modified. Deserialization goes through the same checks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "TriMeshBuffers")
)]
pub struct TriMesh {
    vertices: Vec<Point<Real>>,
    uvs: Vec<TexCoord<Real>>,
    indices: Vec<[u32; 3]>,
}

/// The unchecked buffers of a serialized [`TriMesh`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TriMeshBuffers {
    vertices: Vec<Point<Real>>,
    uvs: Vec<TexCoord<Real>>,
    indices: Vec<[u32; 3]>,
}

#[cfg(feature = "serde")]
impl TryFrom<TriMeshBuffers> for TriMesh {
    type Error = TriMeshBuilderError;

    fn try_from(buffers: TriMeshBuffers) -> Result<Self, Self::Error> {
        TriMesh::new(buffers.vertices, buffers.uvs, buffers.indices)
    }
}

impl TriMesh {
    /// Creates a new triangle mesh from a vertex buffer, a texture coordinate buffer, and an
    /// index buffer.
    ///
    /// `uvs` may be empty if the mesh is not textured, in which case traces report zero
    /// texture coordinates.
    ///
    /// ```rust
    /// use walkthrough3d::shape::{TriMesh, TriMeshBuilderError};
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    ///
    /// assert!(TriMesh::new(vertices.clone(), vec![], vec![[0, 1, 2]]).is_ok());
    /// assert_eq!(
    ///     TriMesh::new(vertices, vec![], vec![[0, 1, 3]]),
    ///     Err(TriMeshBuilderError::DanglingIndex { triangle: 0, vertex: 3 })
    /// );
    /// ```
    pub fn new(
        vertices: Vec<Point<Real>>,
        uvs: Vec<TexCoord<Real>>,
        indices: Vec<[u32; 3]>,
    ) -> Result<Self, TriMeshBuilderError> {
        if indices.is_empty() {
            return Err(TriMeshBuilderError::EmptyIndices);
        }

        if !uvs.is_empty() && uvs.len() != vertices.len() {
            return Err(TriMeshBuilderError::UvCountMismatch {
                vertices: vertices.len(),
                uvs: uvs.len(),
            });
        }

        if let Some(i) = vertices
            .iter()
            .position(|pt| !pt.coords.iter().all(|x| x.is_finite()))
        {
            return Err(TriMeshBuilderError::NonFiniteVertex(i as u32));
        }

        for (tid, idx) in indices.iter().enumerate() {
            if let Some(vid) = idx.iter().find(|vid| **vid as usize >= vertices.len()) {
                return Err(TriMeshBuilderError::DanglingIndex {
                    triangle: tid as u32,
                    vertex: *vid,
                });
            }
        }

        let result = Self {
            vertices,
            uvs,
            indices,
        };

        if let Some(tid) =
            (0..result.num_triangles()).find(|tid| result.triangle_normal(*tid).is_none())
        {
            return Err(TriMeshBuilderError::DegenerateTriangle(tid));
        }

        Ok(result)
    }

    /// Creates a new triangle mesh from a flat index buffer, three indices per triangle.
    pub fn from_flat_indices(
        vertices: Vec<Point<Real>>,
        uvs: Vec<TexCoord<Real>>,
        indices: &[u32],
    ) -> Result<Self, TriMeshBuilderError> {
        if indices.len() % 3 != 0 {
            return Err(TriMeshBuilderError::IndexCountNotMultipleOfThree(
                indices.len(),
            ));
        }

        let indices = indices
            .chunks_exact(3)
            .map(|idx| [idx[0], idx[1], idx[2]])
            .collect();
        Self::new(vertices, uvs, indices)
    }

    /// The vertex buffer of this mesh.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The texture coordinate buffer of this mesh, empty if it is not textured.
    #[inline]
    pub fn uvs(&self) -> &[TexCoord<Real>] {
        &self.uvs
    }

    /// The index buffer of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The number of triangles of this mesh.
    #[inline]
    pub fn num_triangles(&self) -> u32 {
        self.indices.len() as u32
    }

    /// The three vertices of the `i`-th triangle.
    #[inline]
    pub fn triangle(&self, i: u32) -> [Point<Real>; 3] {
        let idx = self.indices[i as usize];
        [
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        ]
    }

    /// The AABB of the `i`-th triangle.
    #[inline]
    pub fn triangle_aabb(&self, i: u32) -> Aabb {
        Aabb::from_points(self.triangle(i))
    }

    /// The unit normal of the `i`-th triangle, following its counter-clockwise winding.
    ///
    /// Returns `None` if the triangle is degenerate, which cannot happen for a mesh
    /// successfully built.
    #[inline]
    pub fn triangle_normal(&self, i: u32) -> Option<Vector<Real>> {
        let [a, b, c] = self.triangle(i);
        (b - a).cross(&(c - a)).try_normalize(0.0)
    }

    /// Interpolates the texture coordinates of the `i`-th triangle at the point with the given
    /// barycentric coordinates.
    pub fn interpolate_uv(&self, i: u32, bcoords: &Vector<Real>) -> TexCoord<Real> {
        if self.uvs.is_empty() {
            return TexCoord::origin();
        }

        let idx = self.indices[i as usize];
        let uv = self.uvs[idx[0] as usize].coords * bcoords[0]
            + self.uvs[idx[1] as usize].coords * bcoords[1]
            + self.uvs[idx[2] as usize].coords * bcoords[2];
        uv.into()
    }

    /// The AABB of the whole mesh.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }
}
