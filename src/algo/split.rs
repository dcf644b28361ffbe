//! Single-cell splits.
//!
//! A split cuts a cell `[a, b, c, d]` across one pair of opposite edges at a
//! parameter `t`, keeps one half in the original cell slot, and appends the
//! other half as a new cell. Both halves keep the original winding.
//!
//! | Direction | Crossed edges | Kept half | Appended half |
//! |-----------|---------------|-----------|---------------|
//! | [`Horizontal`](SplitDirection::Horizontal) | `a–b`, `d–c` | `[a, p, q, d]` | `[p, b, c, q]` |
//! | [`Vertical`](SplitDirection::Vertical) | `b–c`, `a–d` | `[a, b, p, q]` | `[q, p, c, d]` |
//!
//! The welded variants share the two cut positions between both halves; the
//! disjoint variants give each half its own copies.

use nalgebra::{Point3, Vector3};

use crate::mesh::{lerp, lerp_normal, CellId, QuadMesh};

/// Which pair of opposite edges a split crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitDirection {
    /// Cut across the `a–b` and `d–c` edges.
    Horizontal,
    /// Cut across the `b–c` and `a–d` edges.
    Vertical,
}

impl SplitDirection {
    /// Corner slot where the first crossed edge starts.
    ///
    /// The crossed edges are `slot → slot + 1` and `slot + 2 → slot + 3`.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            SplitDirection::Horizontal => 0,
            SplitDirection::Vertical => 1,
        }
    }
}

/// Positions and cell produced by one welded split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellSplit {
    /// The appended half.
    pub created: CellId,
    /// Cut position on the edge starting at `slot`.
    pub near: usize,
    /// Cut position on the opposite edge.
    pub far: usize,
}

/// Split `cell` across the edge starting at `slot` and its opposite edge.
///
/// With corners `c0..c3` counted from `slot`, the near cut point sits at
/// `lerp(c0, c1, t)` and the far one at `lerp(c3, c2, t)`, so both are the
/// same fraction away from the `c0–c3` side. When `near` is given, that
/// existing position is reused instead of creating one; this is how a loop
/// cut stitches into the cell it just left.
pub(crate) fn split_at_slot(
    mesh: &mut QuadMesh,
    cell: CellId,
    slot: usize,
    t: f64,
    near: Option<usize>,
) -> CellSplit {
    let corners = *mesh.cell(cell);
    let [c0, c1, c2, c3] = [0, 1, 2, 3].map(|k| corners[(slot + k) % 4]);

    let near = match near {
        Some(existing) => existing,
        None => add_interpolated(mesh, c0, c1, t),
    };
    let far = add_interpolated(mesh, c3, c2, t);

    let mut kept = corners;
    kept[(slot + 1) % 4] = near;
    kept[(slot + 2) % 4] = far;

    let mut appended = corners;
    appended[slot] = near;
    appended[(slot + 3) % 4] = far;

    mesh.cells[cell.index()] = kept;
    let created = mesh.add_cell(appended);

    CellSplit { created, near, far }
}

fn add_interpolated(mesh: &mut QuadMesh, from: usize, to: usize, t: f64) -> usize {
    let position = lerp(&mesh.positions[from], &mesh.positions[to], t);
    let normal = lerp_normal(&mesh.normals[from], &mesh.normals[to], t);
    mesh.add_position(position, normal)
}

/// Split a cell in the given direction, sharing the cut positions.
///
/// Adds 2 positions and 1 cell. The original cell keeps the half that
/// contains corner `a`; the returned handle is the other half.
pub fn split(mesh: &mut QuadMesh, cell: CellId, direction: SplitDirection, t: f64) -> CellId {
    split_at_slot(mesh, cell, direction.slot(), t, None).created
}

/// Split across the `b–c` and `a–d` edges. See [`split`].
pub fn split_vertical(mesh: &mut QuadMesh, cell: CellId, t: f64) -> CellId {
    split(mesh, cell, SplitDirection::Vertical, t)
}

/// Split across the `a–b` and `d–c` edges. See [`split`].
pub fn split_horizontal(mesh: &mut QuadMesh, cell: CellId, t: f64) -> CellId {
    split(mesh, cell, SplitDirection::Horizontal, t)
}

/// Split a cell without sharing the cut positions between the halves.
///
/// Adds 4 positions and 1 cell. Every new position carries the cell's face
/// normal, so each half can later be shaded or extruded independently.
pub fn split_disjoint(
    mesh: &mut QuadMesh,
    cell: CellId,
    direction: SplitDirection,
    t: f64,
) -> CellId {
    let slot = direction.slot();
    let corners = *mesh.cell(cell);
    let [c0, c1, c2, c3] = [0, 1, 2, 3].map(|k| mesh.positions[corners[(slot + k) % 4]]);
    let normal = mesh.cell_normal(cell);

    let near_point: Point3<f64> = lerp(&c0, &c1, t);
    let far_point: Point3<f64> = lerp(&c3, &c2, t);

    let mut kept = corners;
    kept[(slot + 1) % 4] = mesh.add_position(near_point, normal);
    kept[(slot + 2) % 4] = mesh.add_position(far_point, normal);

    let mut appended = corners;
    appended[slot] = mesh.add_position(near_point, normal);
    appended[(slot + 3) % 4] = mesh.add_position(far_point, normal);

    mesh.cells[cell.index()] = kept;
    mesh.add_cell(appended)
}

/// Disjoint split across the `b–c` and `a–d` edges. See [`split_disjoint`].
pub fn split_vertical_disjoint(mesh: &mut QuadMesh, cell: CellId, t: f64) -> CellId {
    split_disjoint(mesh, cell, SplitDirection::Vertical, t)
}

/// Disjoint split across the `a–b` and `d–c` edges. See [`split_disjoint`].
pub fn split_horizontal_disjoint(mesh: &mut QuadMesh, cell: CellId, t: f64) -> CellId {
    split_disjoint(mesh, cell, SplitDirection::Horizontal, t)
}

/// Pick the split direction whose cut advances along `axis`.
///
/// Returns the direction whose crossed edges are best aligned with `axis`,
/// and the parameter to pass so the cut lands at fraction `t` measured in
/// the positive `axis` direction. Authoring scripts use this to say "cut at
/// 60% of the height" without caring how a cell's corners happen to be
/// ordered.
pub fn orient_split(
    mesh: &QuadMesh,
    cell: CellId,
    axis: &Vector3<f64>,
    t: f64,
) -> (SplitDirection, f64) {
    let corners = mesh.cell_positions(cell);
    let alignment = |direction: SplitDirection| {
        let slot = direction.slot();
        let edge = corners[(slot + 1) % 4] - corners[slot];
        edge.normalize().dot(axis)
    };

    let horizontal = alignment(SplitDirection::Horizontal);
    let vertical = alignment(SplitDirection::Vertical);
    let (direction, along) = if horizontal.abs() >= vertical.abs() {
        (SplitDirection::Horizontal, horizontal)
    } else {
        (SplitDirection::Vertical, vertical)
    };

    if along < 0.0 {
        (direction, 1.0 - t)
    } else {
        (direction, t)
    }
}
