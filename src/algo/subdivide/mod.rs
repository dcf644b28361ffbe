//! Catmull-Clark subdivision.
//!
//! Each pass turns every n-sided cell into n quads fanned around its
//! centroid:
//!
//! 1. A face point at each cell centroid
//! 2. An edge point on each edge, averaging the adjacent face points with
//!    both endpoints
//! 3. A moved copy of each original point, weighted from its adjacent face
//!    points, edge midpoints and itself
//! 4. One quad `[edge before, moved corner, edge after, face point]` per
//!    cell corner
//!
//! The input may mix triangles and quads; the output is always quads until
//! the optional final triangulation. Normals are derived from the subdivided
//! geometry, never carried over from the input.
//!
//! # Example
//!
//! ```
//! use boxmodel::algo::{subdivide_mesh, SubdivideOptions};
//! use boxmodel::mesh::create_box;
//!
//! let cube = create_box(1.0, 1.0, 1.0);
//! let smooth = subdivide_mesh(&cube, &SubdivideOptions::new(1).quads()).unwrap();
//! assert_eq!(smooth.positions().len(), 26);
//! assert_eq!(smooth.num_cells(), 24);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;

pub use catmull_clark::{
    subdivide, subdivide_mesh, subdivide_mesh_with_progress, subdivide_with_progress,
};

use nalgebra::Point3;

use crate::mesh::{QuadMesh, TriangleMesh};

/// Options for subdivision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdivideOptions {
    /// Number of subdivision passes. Must be at least 1.
    pub iterations: usize,

    /// Whether to split the final quads into triangles (default: true).
    pub convert_to_triangles: bool,
}

impl SubdivideOptions {
    /// Create options with the specified number of passes.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            convert_to_triangles: true,
        }
    }

    /// Set whether to triangulate the result.
    pub fn with_triangles(mut self, convert: bool) -> Self {
        self.convert_to_triangles = convert;
        self
    }

    /// Keep the result as quads.
    pub fn quads(mut self) -> Self {
        self.convert_to_triangles = false;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Output of [`subdivide`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubdividedMesh {
    /// Quad cells, as produced by each pass.
    Quads(QuadMesh),
    /// Each quad split along its `a–c` diagonal.
    Triangles(TriangleMesh),
}

impl SubdividedMesh {
    /// Get the vertex positions.
    pub fn positions(&self) -> &[Point3<f64>] {
        match self {
            SubdividedMesh::Quads(mesh) => &mesh.positions,
            SubdividedMesh::Triangles(mesh) => &mesh.positions,
        }
    }

    /// Get the number of cells, quads or triangles.
    pub fn num_cells(&self) -> usize {
        match self {
            SubdividedMesh::Quads(mesh) => mesh.num_cells(),
            SubdividedMesh::Triangles(mesh) => mesh.num_cells(),
        }
    }

    /// Convert to triangles, splitting quads if needed.
    pub fn into_triangles(self) -> TriangleMesh {
        match self {
            SubdividedMesh::Quads(mesh) => mesh.to_triangles(),
            SubdividedMesh::Triangles(mesh) => mesh,
        }
    }
}
