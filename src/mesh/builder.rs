//! Primitive construction.
//!
//! The box is built with the same operators a modeler would use by hand: a
//! single quad, a flipped copy of it, an extrusion of the copy, and a final
//! weld. The welded result is the usual 8-corner, 6-face cuboid.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use super::index::CellId;
use super::quad::QuadMesh;
use super::weld::merge_positions;
use crate::algo::extrude_disjoint;

/// Create a welded box centered at the origin.
///
/// The box spans `±width/2` on X, `±height/2` on Y and `±depth/2` on Z. The
/// result always has 8 positions and 6 outward-facing cells, with vertex
/// normals averaged from the adjacent faces.
///
/// # Example
///
/// ```
/// use boxmodel::mesh::create_box;
///
/// let mesh = create_box(1.0, 2.0, 1.0);
/// assert_eq!(mesh.num_positions(), 8);
/// assert_eq!(mesh.num_cells(), 6);
/// ```
pub fn create_box(width: f64, height: f64, depth: f64) -> QuadMesh {
    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

    // Bottom face, wound to face -Y.
    let mut mesh = QuadMesh::from_quads(
        vec![
            Point3::new(-hw, -hh, -hd),
            Point3::new(hw, -hh, -hd),
            Point3::new(hw, -hh, hd),
            Point3::new(-hw, -hh, hd),
        ],
        vec![[0, 1, 2, 3]],
    );

    let top = duplicate_flipped(&mut mesh, CellId::new(0));
    extrude_disjoint(&mut mesh, top, 0.0, height);
    merge_positions(&mut mesh);

    debug!(
        width,
        height,
        depth,
        positions = mesh.num_positions(),
        cells = mesh.num_cells(),
        "created box"
    );
    mesh
}

/// Create a single quad in the XY plane, centered at the origin and facing +Z.
pub fn create_quad(width: f64, height: f64) -> QuadMesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    QuadMesh::from_quads(
        vec![
            Point3::new(-hw, -hh, 0.0),
            Point3::new(hw, -hh, 0.0),
            Point3::new(hw, hh, 0.0),
            Point3::new(-hw, hh, 0.0),
        ],
        vec![[0, 1, 2, 3]],
    )
}

/// Append an unwelded copy of `cell` with reversed winding.
///
/// The copy keeps the first corner and walks the rest backwards, so
/// `[a, b, c, d]` becomes `[a', d', c', b']` and faces the other way.
fn duplicate_flipped(mesh: &mut QuadMesh, cell: CellId) -> CellId {
    let [a, b, c, d] = *mesh.cell(cell);
    let flipped: Vec<usize> = [a, d, c, b]
        .iter()
        .map(|&i| {
            let position = mesh.positions[i];
            let normal: Vector3<f64> = -mesh.normals[i];
            mesh.add_position(position, normal)
        })
        .collect();
    mesh.add_cell([flipped[0], flipped[1], flipped[2], flipped[3]])
}
