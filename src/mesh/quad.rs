//! Indexed quad and triangle meshes.
//!
//! # Structure
//!
//! A [`QuadMesh`] is three flat arrays:
//!
//! - `positions`: 3D points; a point's index is its identity everywhere else
//! - `normals`: unit vectors, index-aligned with `positions`
//! - `cells`: `[a, b, c, d]` corner indices, counter-clockwise seen from outside
//!
//! There is no edge table. Two cells are edge-neighbors when one holds the
//! directed edge `u → v` and the other holds `v → u`; all such queries are
//! answered by a linear scan over `cells`.

use nalgebra::{Point3, Vector3};

use super::index::CellId;
use super::normals::{face_normal, vertex_normals};
use super::triangulate::quads_to_tris;
use crate::error::{MeshError, Result};

/// Linear interpolation between two points.
///
/// At `t == 0` the result is exactly `a`.
#[inline]
pub fn lerp(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    a + (b - a) * t
}

/// A mesh of quadrilateral cells with per-position normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Vertex normals, index-aligned with `positions`.
    pub normals: Vec<Vector3<f64>>,

    /// Quad cells as counter-clockwise corner indices.
    pub cells: Vec<[usize; 4]>,
}

impl QuadMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from positions and cells, deriving normals from geometry.
    pub fn from_quads(positions: Vec<Point3<f64>>, cells: Vec<[usize; 4]>) -> Self {
        let normals = vertex_normals(&positions, &cells);
        Self {
            positions,
            normals,
            cells,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of positions.
    #[inline]
    pub fn num_positions(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Get the corner indices of a cell.
    #[inline]
    pub fn cell(&self, id: CellId) -> &[usize; 4] {
        &self.cells[id.index()]
    }

    /// Iterate over all cell handles.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len()).map(CellId::new)
    }

    /// Get the corner positions of a cell.
    pub fn cell_positions(&self, id: CellId) -> [Point3<f64>; 4] {
        (*self.cell(id)).map(|i| self.positions[i])
    }

    /// Get the centroid (mean of the four corners) of a cell.
    pub fn cell_centroid(&self, id: CellId) -> Point3<f64> {
        let sum: Vector3<f64> = self.cell(id).iter().map(|&i| self.positions[i].coords).sum();
        Point3::from(sum / 4.0)
    }

    /// Get the face normal of a cell.
    #[inline]
    pub fn cell_normal(&self, id: CellId) -> Vector3<f64> {
        face_normal(&self.positions, self.cell(id))
    }

    /// Get the planar area of a cell, summed over its two triangles.
    pub fn cell_area(&self, id: CellId) -> f64 {
        let [a, b, c, d] = self.cell_positions(id);
        0.5 * ((b - a).cross(&(c - a)).norm() + (c - a).cross(&(d - a)).norm())
    }

    /// Compute the axis-aligned bounding box.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        bounding_box(&self.positions)
    }

    // ==================== Mutation ====================

    /// Append a position with its normal; returns the new position index.
    #[inline]
    pub fn add_position(&mut self, position: Point3<f64>, normal: Vector3<f64>) -> usize {
        self.positions.push(position);
        self.normals.push(normal);
        self.positions.len() - 1
    }

    /// Append a cell; returns its handle.
    #[inline]
    pub fn add_cell(&mut self, cell: [usize; 4]) -> CellId {
        self.cells.push(cell);
        CellId::new(self.cells.len() - 1)
    }

    /// Recompute every normal by averaging adjacent face normals.
    pub fn recompute_normals(&mut self) {
        self.normals = vertex_normals(&self.positions, &self.cells);
    }

    /// Translate every position by `offset`.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Remove position `removed`, pointing its references at `keep`.
    ///
    /// Every index above `removed` shifts down by one so the position array
    /// stays dense. The normal at `removed` is dropped with it.
    pub(crate) fn replace_position(&mut self, removed: usize, keep: usize) {
        let keep = if keep > removed { keep - 1 } else { keep };

        self.positions.remove(removed);
        if removed < self.normals.len() {
            self.normals.remove(removed);
        }

        for cell in &mut self.cells {
            for index in cell.iter_mut() {
                if *index == removed {
                    *index = keep;
                } else if *index > removed {
                    *index -= 1;
                }
            }
        }
    }

    // ==================== Conversion ====================

    /// Convert to a triangle mesh, splitting each quad along its `a–c` diagonal.
    pub fn to_triangles(&self) -> TriangleMesh {
        TriangleMesh {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            cells: quads_to_tris(&self.cells),
        }
    }

    // ==================== Validation ====================

    /// Check the structural invariants of the mesh.
    ///
    /// - every cell index is in range
    /// - no cell repeats an index
    /// - there is exactly one normal per position
    pub fn validate(&self) -> Result<()> {
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }
        validate_cells(&self.cells, self.positions.len())
    }

    /// Check whether [`validate`](Self::validate) passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A mesh of triangles with per-position normals.
///
/// This is the shape consumed by the renderer: flat positions and normals
/// plus an index list, with no further interpretation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Vertex normals, index-aligned with `positions`.
    pub normals: Vec<Vector3<f64>>,

    /// Triangle cells as counter-clockwise corner indices.
    pub cells: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of positions.
    #[inline]
    pub fn num_positions(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Get the area of a triangle.
    pub fn cell_area(&self, index: usize) -> f64 {
        let [a, b, c] = self.cells[index].map(|i| self.positions[i]);
        0.5 * (b - a).cross(&(c - a)).norm()
    }

    /// Compute the axis-aligned bounding box.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        bounding_box(&self.positions)
    }

    /// Translate every position by `offset`.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Append another mesh, offsetting its indices past the existing positions.
    pub fn append(&mut self, other: &TriangleMesh) {
        let offset = self.positions.len();
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.cells
            .extend(other.cells.iter().map(|cell| (*cell).map(|i| i + offset)));
    }

    /// Check the structural invariants of the mesh.
    pub fn validate(&self) -> Result<()> {
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }
        validate_cells(&self.cells, self.positions.len())
    }
}

fn validate_cells<C: AsRef<[usize]>>(cells: &[C], num_positions: usize) -> Result<()> {
    for (ci, cell) in cells.iter().enumerate() {
        let cell = cell.as_ref();
        for (k, &position) in cell.iter().enumerate() {
            if position >= num_positions {
                return Err(MeshError::InvalidPositionIndex { cell: ci, position });
            }
            if cell[..k].contains(&position) {
                return Err(MeshError::DegenerateCell { cell: ci, position });
            }
        }
    }
    Ok(())
}

fn bounding_box(positions: &[Point3<f64>]) -> Option<(Point3<f64>, Point3<f64>)> {
    let first = positions.first()?;
    let (min, max) = positions
        .iter()
        .skip(1)
        .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));
    Some((min, max))
}
