//! Face inset.
//!
//! Insetting `[c0, c1, c2, c3]` by `t` pulls each corner toward the centroid,
//! `i_k = lerp(c_k, centroid, t)`. The original cell is rewritten in place to
//! `[i0, i1, i2, i3]` and four ring cells `[c_k, c_{k+1}, i_{k+1}, i_k]` are
//! appended, in corner order, to bridge the gap. All five cells keep the
//! winding of the original.

use nalgebra::{Point3, Vector3};

use crate::mesh::{lerp, CellId, QuadMesh};

/// Cells produced by an inset or extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inset {
    /// The shrunken cell. This is always the cell that was inset.
    pub inner: CellId,
    /// Ring cells, `ring[k]` bordering the original edge `c_k → c_{k+1}`.
    pub ring: [CellId; 4],
}

impl Inset {
    /// All five cells, inner first.
    pub fn cells(&self) -> [CellId; 5] {
        [
            self.inner,
            self.ring[0],
            self.ring[1],
            self.ring[2],
            self.ring[3],
        ]
    }
}

/// Inner corner points of an inset, in corner order.
fn inset_points(mesh: &QuadMesh, cell: CellId, t: f64) -> [Point3<f64>; 4] {
    let centroid = mesh.cell_centroid(cell);
    mesh.cell_positions(cell).map(|corner| lerp(&corner, &centroid, t))
}

/// Inset a cell, sharing the original corners with the ring.
///
/// Adds 4 positions and 4 cells. New positions carry the cell's face normal.
/// At `t == 0` the new positions coincide exactly with the corners.
pub fn inset(mesh: &mut QuadMesh, cell: CellId, t: f64) -> Inset {
    let outer = *mesh.cell(cell);
    let normal = mesh.cell_normal(cell);
    let inner = inset_points(mesh, cell, t).map(|p| mesh.add_position(p, normal));

    mesh.cells[cell.index()] = inner;
    let ring = [0, 1, 2, 3].map(|k| {
        let next = (k + 1) % 4;
        mesh.add_cell([outer[k], outer[next], inner[next], inner[k]])
    });

    Inset { inner: cell, ring }
}

/// Inset a cell without sharing anything between the five resulting cells.
///
/// The inner cell keeps its position indices; those positions are moved to
/// the inset points. Each ring cell gets four fresh positions of its own, so
/// 16 positions and 4 cells are added in total. Every touched position takes
/// the cell's face normal.
pub fn inset_disjoint(mesh: &mut QuadMesh, cell: CellId, t: f64) -> Inset {
    let corners = *mesh.cell(cell);
    let outer = mesh.cell_positions(cell);
    let inner = inset_points(mesh, cell, t);
    let normal: Vector3<f64> = mesh.cell_normal(cell);

    let ring = [0, 1, 2, 3].map(|k| {
        let next = (k + 1) % 4;
        let side = [outer[k], outer[next], inner[next], inner[k]].map(|p| mesh.add_position(p, normal));
        mesh.add_cell(side)
    });

    for (k, &i) in corners.iter().enumerate() {
        mesh.positions[i] = inner[k];
        mesh.normals[i] = normal;
    }

    Inset { inner: cell, ring }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::create_quad;
    use approx::assert_relative_eq;

    #[test]
    fn test_inset_counts_and_layout() {
        let mut mesh = create_quad(2.0, 2.0);
        let result = inset(&mut mesh, CellId::new(0), 0.5);

        assert_eq!(mesh.num_positions(), 8);
        assert_eq!(mesh.normals.len(), 8);
        assert_eq!(mesh.num_cells(), 5);
        assert_eq!(result.inner, CellId::new(0));
        assert_eq!(mesh.cells[0], [4, 5, 6, 7]);
        assert_eq!(mesh.cells[1], [0, 1, 5, 4]);
        assert_eq!(mesh.cells[4], [3, 0, 4, 7]);
        assert!(mesh.is_valid());

        assert_relative_eq!(mesh.positions[4], Point3::new(-0.5, -0.5, 0.0));
        assert_relative_eq!(mesh.positions[6], Point3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_inset_zero_is_degenerate_ring() {
        let mut mesh = create_quad(1.0, 3.0);
        inset(&mut mesh, CellId::new(0), 0.0);
        for k in 0..4 {
            assert_eq!(mesh.positions[4 + k], mesh.positions[k]);
        }
    }

    #[test]
    fn test_inset_preserves_area_and_winding() {
        let mut mesh = create_quad(2.0, 1.0);
        let result = inset(&mut mesh, CellId::new(0), 0.3);

        let area: f64 = result.cells().iter().map(|&c| mesh.cell_area(c)).sum();
        assert_relative_eq!(area, 2.0, epsilon = 1e-12);
        for c in result.cells() {
            assert_relative_eq!(mesh.cell_normal(c), Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inset_disjoint() {
        let mut mesh = create_quad(2.0, 2.0);
        let result = inset_disjoint(&mut mesh, CellId::new(0), 0.5);

        assert_eq!(mesh.num_positions(), 20);
        assert_eq!(mesh.num_cells(), 5);
        assert_eq!(*mesh.cell(result.inner), [0, 1, 2, 3]);
        assert_relative_eq!(mesh.positions[0], Point3::new(-0.5, -0.5, 0.0));

        // No ring cell shares a position with any other cell.
        for (i, a) in mesh.cells.iter().enumerate() {
            for b in &mesh.cells[i + 1..] {
                assert!(a.iter().all(|p| !b.contains(p)));
            }
        }
        assert!(mesh.is_valid());
    }
}
