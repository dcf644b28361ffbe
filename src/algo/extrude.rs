//! Face extrusion.
//!
//! An extrusion is an [inset](super::inset()) followed by a translation of
//! the inner cell along the original face normal. Positive distances move
//! outward, negative distances push the face into the surface.

use tracing::trace;

use super::inset::{inset, inset_disjoint, Inset};
use crate::mesh::{face_normal, recompute_normals_at, CellId, QuadMesh};

/// Inset `cell` by `inset_amount`, then move it by `distance` along its normal.
///
/// Normals of the moved corners and of the original outer corners are
/// re-averaged from their adjacent faces afterwards. A `distance` of zero
/// leaves every position exactly where [`inset`] put it.
pub fn extrude(mesh: &mut QuadMesh, cell: CellId, inset_amount: f64, distance: f64) -> Inset {
    let normal = mesh.cell_normal(cell);
    let outer = *mesh.cell(cell);
    let result = inset(mesh, cell, inset_amount);

    let inner = *mesh.cell(result.inner);
    let offset = normal * distance;
    for &i in &inner {
        mesh.positions[i] += offset;
    }

    let touched: Vec<usize> = inner.iter().chain(&outer).copied().collect();
    recompute_normals_at(mesh, &touched);

    trace!(cell = cell.index(), inset_amount, distance, "extruded cell");
    result
}

/// Extrude without sharing positions between the inner cell and its ring.
///
/// The inner cell and the inner edge of every ring cell move together by
/// `distance`. Because nothing is shared, each ring cell's normals are set
/// directly to its own face normal instead of being averaged.
pub fn extrude_disjoint(
    mesh: &mut QuadMesh,
    cell: CellId,
    inset_amount: f64,
    distance: f64,
) -> Inset {
    let normal = mesh.cell_normal(cell);
    let result = inset_disjoint(mesh, cell, inset_amount);
    let offset = normal * distance;

    let inner = *mesh.cell(result.inner);
    for i in inner {
        mesh.positions[i] += offset;
    }
    for side in result.ring {
        let [_, _, c, d] = *mesh.cell(side);
        mesh.positions[c] += offset;
        mesh.positions[d] += offset;

        let corners = *mesh.cell(side);
        let side_normal = face_normal(&mesh.positions, &corners);
        for i in corners {
            mesh.normals[i] = side_normal;
        }
    }

    trace!(cell = cell.index(), inset_amount, distance, "extruded disjoint cell");
    result
}
