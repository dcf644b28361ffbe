//! Edge loops: loop cuts and ring queries.
//!
//! A loop is the strip of cells reached by repeatedly stepping across the
//! edge opposite the one you entered through. Neighbors are found by a
//! linear scan for the reversed directed edge, so no adjacency structure has
//! to be kept in sync while the mesh is being edited.
//!
//! The edges a loop crosses are called rungs. Each rung is stored with its
//! endpoint on rail A first; rail A is the side of the seed cell holding the
//! corners at `slot` and `slot + 3` for the chosen [`SplitDirection`].

use std::collections::BTreeSet;

use nalgebra::{Point3, Vector3};
use tracing::{debug, trace};

use super::split::{split_at_slot, SplitDirection};
use crate::mesh::{recompute_normals_at, CellId, QuadMesh};

/// Find the cell holding the directed edge `to → from`.
///
/// That is the neighbor across `from → to` for consistently wound meshes.
/// Returns the cell and the slot where the edge starts, so that
/// `cell[slot] == to` and `cell[slot + 1] == from`.
pub fn find_neighbor(mesh: &QuadMesh, from: usize, to: usize) -> Option<(CellId, usize)> {
    mesh.cells.iter().enumerate().find_map(|(ci, cell)| {
        (0..4)
            .find(|&s| cell[s] == to && cell[(s + 1) % 4] == from)
            .map(|s| (CellId::new(ci), s))
    })
}

// ==================== Loop cut ====================

/// An edge the cut is about to cross.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    from: usize,
    to: usize,
    /// Cut position already placed on the edge.
    point: usize,
    /// Fraction of the way from `from` to `to` where `point` sits.
    t: f64,
}

impl Crossing {
    fn same_edge(&self, other: &Crossing) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

/// Result of a loop cut.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSplit {
    /// Cells appended by the cut, in order along the loop.
    pub created: Vec<CellId>,
    /// Positions along the cut line, in order along the loop.
    pub positions: Vec<usize>,
    /// Whether the cut went all the way around and was welded shut.
    pub closed: bool,
    /// The half of the seed cell that was appended.
    pub seed_created: CellId,
}

/// Walk across successive neighbors, splitting each one.
///
/// Returns the cut positions and appended cells in walk order plus the last
/// crossing, which is where the walk stopped.
fn walk_split(
    mesh: &mut QuadMesh,
    mut crossing: Crossing,
    limit: usize,
) -> (Vec<usize>, Vec<CellId>, Crossing) {
    let mut positions = Vec::new();
    let mut created = Vec::new();

    for _ in 0..limit {
        let Some((neighbor, slot)) = find_neighbor(mesh, crossing.from, crossing.to) else {
            break;
        };
        let corners = *mesh.cell(neighbor);
        let (next_from, next_to) = (corners[(slot + 2) % 4], corners[(slot + 3) % 4]);

        let piece = split_at_slot(mesh, neighbor, slot, 1.0 - crossing.t, Some(crossing.point));
        trace!(cell = neighbor.index(), slot, "loop cut crossed cell");

        positions.push(piece.far);
        created.push(piece.created);
        crossing = Crossing {
            from: next_from,
            to: next_to,
            point: piece.far,
            t: crossing.t,
        };
    }

    (positions, created, crossing)
}

/// Cut an edge loop through `cell` and every cell reachable across the
/// edges the cut crosses.
///
/// The seed cell is split like [`split`](super::split()) with the same
/// `direction` and `t`. The cut then walks outward in both directions,
/// splitting each neighbor so the cut positions are shared, until a walk
/// runs off a boundary. If both walks end on the same edge the loop wrapped
/// around a ring of cells; the two end positions are then merged into one.
///
/// Adds one cell per cell crossed, and one position per rung.
pub fn split_loop(mesh: &mut QuadMesh, cell: CellId, direction: SplitDirection, t: f64) -> LoopSplit {
    let slot = direction.slot();
    let corners = *mesh.cell(cell);
    let c = |k: usize| corners[(slot + k) % 4];
    let limit = mesh.num_cells();

    let seed = split_at_slot(mesh, cell, slot, t, None);

    let forward_start = Crossing {
        from: c(0),
        to: c(1),
        point: seed.near,
        t,
    };
    let (forward_positions, forward_cells, forward_end) = walk_split(mesh, forward_start, limit);

    let backward_start = Crossing {
        from: c(2),
        to: c(3),
        point: seed.far,
        t: 1.0 - t,
    };
    let (backward_positions, backward_cells, backward_end) =
        walk_split(mesh, backward_start, limit);

    let mut positions: Vec<usize> = backward_positions.into_iter().rev().collect();
    positions.push(seed.far);
    positions.push(seed.near);
    positions.extend(forward_positions);

    let mut created: Vec<CellId> = backward_cells.into_iter().rev().collect();
    created.push(seed.created);
    created.extend(forward_cells);

    let closed = forward_end.same_edge(&backward_end);
    if closed {
        let keep = forward_end.point.min(backward_end.point);
        let removed = forward_end.point.max(backward_end.point);
        mesh.replace_position(removed, keep);
        positions = remap_after_removal(&positions, removed, keep);
    }

    debug!(
        cells = created.len(),
        positions = positions.len(),
        closed,
        "split loop"
    );

    LoopSplit {
        created,
        positions,
        closed,
        seed_created: seed.created,
    }
}

/// Rewrite indices the way [`QuadMesh::replace_position`] does, dropping
/// the duplicate that results.
fn remap_after_removal(positions: &[usize], removed: usize, keep: usize) -> Vec<usize> {
    let mut remapped: Vec<usize> = Vec::with_capacity(positions.len());
    for &p in positions {
        let p = if p == removed {
            keep
        } else if p > removed {
            p - 1
        } else {
            p
        };
        if !remapped.contains(&p) {
            remapped.push(p);
        }
    }
    remapped
}

/// Cut two parallel loops that leave a border of width `t` on both sides.
///
/// The first cut lands at `t` along the seed's crossed edges, the second at
/// `1 - t` of the same original edges. `t` is expected in `(0, 0.5)`.
pub fn inset_loop(
    mesh: &mut QuadMesh,
    cell: CellId,
    direction: SplitDirection,
    t: f64,
) -> (LoopSplit, LoopSplit) {
    let first = split_loop(mesh, cell, direction, t);
    // The appended half starts at the first cut, so rescale onto what is left.
    let second = split_loop(mesh, first.seed_created, direction, (1.0 - 2.0 * t) / (1.0 - t));
    (first, second)
}

// ==================== Loop queries ====================

/// A ring or strip of cells found by [`find_loop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadLoop {
    /// Cells in walk order.
    pub cells: Vec<CellId>,
    /// Crossed edges, rail A endpoint first.
    ///
    /// An open strip has one more rung than cells; a closed ring has as
    /// many rungs as cells.
    pub edges: Vec<[usize; 2]>,
    /// Whether the walk came back to the seed cell.
    pub closed: bool,
}

impl QuadLoop {
    /// Every position on the loop, in rung order, without repeats.
    pub fn vertices(&self) -> Vec<usize> {
        let mut vertices = Vec::with_capacity(self.edges.len() * 2);
        for &i in self.edges.iter().flatten() {
            if !vertices.contains(&i) {
                vertices.push(i);
            }
        }
        vertices
    }

    /// The two sides of the loop: rail A and rail B.
    pub fn rails(&self) -> (Vec<usize>, Vec<usize>) {
        self.edges.iter().map(|&[a, b]| (a, b)).unzip()
    }
}

/// Walk across rungs without editing anything.
fn walk_rungs(
    mesh: &QuadMesh,
    seed: CellId,
    start: [usize; 2],
    rail_a_first: bool,
    limit: usize,
) -> (Vec<CellId>, Vec<[usize; 2]>, bool) {
    let mut cells = Vec::new();
    let mut rungs = Vec::new();
    let [mut from, mut to] = start;

    for _ in 0..limit {
        let Some((neighbor, slot)) = find_neighbor(mesh, from, to) else {
            break;
        };
        if neighbor == seed {
            return (cells, rungs, true);
        }
        let corners = mesh.cell(neighbor);
        from = corners[(slot + 2) % 4];
        to = corners[(slot + 3) % 4];

        cells.push(neighbor);
        rungs.push(if rail_a_first { [from, to] } else { [to, from] });
    }

    (cells, rungs, false)
}

/// Find the loop of cells through `cell` in the given direction.
pub fn find_loop(mesh: &QuadMesh, cell: CellId, direction: SplitDirection) -> QuadLoop {
    let slot = direction.slot();
    let corners = *mesh.cell(cell);
    let c = |k: usize| corners[(slot + k) % 4];
    let limit = mesh.num_cells();

    let near = [c(0), c(1)];
    let far = [c(3), c(2)];

    let (forward_cells, forward_rungs, closed) = walk_rungs(mesh, cell, near, true, limit);
    if closed {
        let mut cells = vec![cell];
        cells.extend(forward_cells);
        // The last forward rung is the seed's far edge.
        let mut edges = vec![near];
        edges.extend(forward_rungs);
        return QuadLoop {
            cells,
            edges,
            closed,
        };
    }

    let (backward_cells, backward_rungs, _) = walk_rungs(mesh, cell, [c(2), c(3)], false, limit);

    let mut cells: Vec<CellId> = backward_cells.into_iter().rev().collect();
    cells.push(cell);
    cells.extend(forward_cells);

    let mut edges: Vec<[usize; 2]> = backward_rungs.into_iter().rev().collect();
    edges.push(far);
    edges.push(near);
    edges.extend(forward_rungs);

    QuadLoop {
        cells,
        edges,
        closed,
    }
}

/// Which per-loop data [`get_loop`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopChannel {
    /// Loop vertex positions.
    Positions,
    /// Loop vertex normals.
    Normals,
    /// Cells in walk order.
    Cells,
}

/// Data gathered along a loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopElements {
    /// Positions in [`QuadLoop::vertices`] order.
    Positions(Vec<Point3<f64>>),
    /// Normals in [`QuadLoop::vertices`] order.
    Normals(Vec<Vector3<f64>>),
    /// Cells in walk order.
    Cells(Vec<CellId>),
}

impl LoopElements {
    /// Number of elements gathered.
    pub fn len(&self) -> usize {
        match self {
            LoopElements::Positions(v) => v.len(),
            LoopElements::Normals(v) => v.len(),
            LoopElements::Cells(v) => v.len(),
        }
    }

    /// Check whether nothing was gathered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Gather positions, normals or cells along the loop through `cell`.
///
/// Positions and normals follow [`QuadLoop::vertices`] order.
pub fn get_loop(
    mesh: &QuadMesh,
    cell: CellId,
    direction: SplitDirection,
    channel: LoopChannel,
) -> LoopElements {
    let quad_loop = find_loop(mesh, cell, direction);
    match channel {
        LoopChannel::Positions => LoopElements::Positions(
            quad_loop.vertices().iter().map(|&i| mesh.positions[i]).collect(),
        ),
        LoopChannel::Normals => LoopElements::Normals(
            quad_loop.vertices().iter().map(|&i| mesh.normals[i]).collect(),
        ),
        LoopChannel::Cells => LoopElements::Cells(quad_loop.cells),
    }
}

/// Move every vertex of a loop by `offset` and refresh the affected normals.
pub fn translate_loop(mesh: &mut QuadMesh, quad_loop: &QuadLoop, offset: &Vector3<f64>) {
    transform_positions(mesh, &quad_loop.vertices(), |p| p + offset);
}

/// Apply `f` to a set of positions and refresh the affected normals.
///
/// Every corner of a cell holding a moved position is re-averaged, since the
/// face normal of that cell changes with it.
pub fn transform_positions<F>(mesh: &mut QuadMesh, indices: &[usize], f: F)
where
    F: Fn(Point3<f64>) -> Point3<f64>,
{
    for &i in indices {
        mesh.positions[i] = f(mesh.positions[i]);
    }

    let touched: BTreeSet<usize> = mesh
        .cells
        .iter()
        .filter(|cell| cell.iter().any(|i| indices.contains(i)))
        .flatten()
        .copied()
        .collect();
    let touched: Vec<usize> = touched.into_iter().collect();
    recompute_normals_at(mesh, &touched);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{create_box, create_quad, merge_positions, vertex_normals};
    use approx::assert_relative_eq;

    /// Three quads in a row along X, one unit each.
    fn strip() -> QuadMesh {
        let mut positions = Vec::new();
        for y in [0.0, 1.0] {
            for x in 0..4 {
                positions.push(Point3::new(x as f64, y, 0.0));
            }
        }
        QuadMesh::from_quads(positions, vec![[0, 1, 5, 4], [1, 2, 6, 5], [2, 3, 7, 6]])
    }

    fn assert_closed(mesh: &QuadMesh) {
        for cell in &mesh.cells {
            for k in 0..4 {
                let (u, v) = (cell[k], cell[(k + 1) % 4]);
                assert!(
                    find_neighbor(mesh, u, v).is_some(),
                    "edge {} -> {} has no neighbor",
                    u,
                    v
                );
            }
        }
    }

    #[test]
    fn test_find_neighbor() {
        let mesh = strip();
        assert_eq!(find_neighbor(&mesh, 2, 6), Some((CellId::new(2), 3)));
        assert_eq!(find_neighbor(&mesh, 5, 1), Some((CellId::new(0), 1)));
        assert_eq!(find_neighbor(&mesh, 0, 1), None);
    }

    #[test]
    fn test_split_loop_open_strip() {
        let mut mesh = strip();
        let cut = split_loop(&mut mesh, CellId::new(1), SplitDirection::Vertical, 0.25);

        assert!(!cut.closed);
        assert_eq!(cut.created.len(), 3);
        assert_eq!(cut.positions.len(), 4);
        assert_eq!(mesh.num_cells(), 6);
        assert_eq!(mesh.num_positions(), 12);
        assert!(mesh.is_valid());

        let xs: Vec<f64> = cut.positions.iter().map(|&i| mesh.positions[i].x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
        for &i in &cut.positions {
            assert_relative_eq!(mesh.positions[i].y, 0.25, epsilon = 1e-12);
        }

        // The cut positions are shared, so there is nothing left to weld.
        assert_eq!(merge_positions(&mut mesh), 0);
    }

    #[test]
    fn test_split_loop_closes_ring() {
        let mut mesh = create_box(1.0, 1.0, 1.0);
        let cut = split_loop(&mut mesh, CellId::new(0), SplitDirection::Horizontal, 0.5);

        assert!(cut.closed);
        assert_eq!(cut.created.len(), 4);
        assert_eq!(cut.positions.len(), 4);
        assert_eq!(mesh.num_cells(), 10);
        assert_eq!(mesh.num_positions(), 12);
        assert!(mesh.is_valid());
        assert_closed(&mesh);
        assert_eq!(merge_positions(&mut mesh), 0);
    }

    #[test]
    fn test_split_loop_single_cell() {
        let mut mesh = create_quad(1.0, 1.0);
        let cut = split_loop(&mut mesh, CellId::new(0), SplitDirection::Horizontal, 0.5);
        assert!(!cut.closed);
        assert_eq!(cut.created, vec![CellId::new(1)]);
        assert_eq!(cut.seed_created, CellId::new(1));
        assert_eq!(mesh.num_positions(), 6);
    }

    #[test]
    fn test_inset_loop() {
        let mut mesh = create_quad(1.0, 1.0);
        let (first, second) = inset_loop(&mut mesh, CellId::new(0), SplitDirection::Horizontal, 0.25);

        assert_eq!(mesh.num_cells(), 3);
        for &i in &first.positions {
            assert_relative_eq!(mesh.positions[i].x, -0.25, epsilon = 1e-12);
        }
        for &i in &second.positions {
            assert_relative_eq!(mesh.positions[i].x, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_find_loop_open() {
        let mesh = strip();
        let found = find_loop(&mesh, CellId::new(1), SplitDirection::Vertical);

        assert!(!found.closed);
        assert_eq!(found.cells, vec![CellId::new(0), CellId::new(1), CellId::new(2)]);
        assert_eq!(found.edges, vec![[0, 4], [1, 5], [2, 6], [3, 7]]);

        let (rail_a, rail_b) = found.rails();
        assert_eq!(rail_a, vec![0, 1, 2, 3]);
        assert_eq!(rail_b, vec![4, 5, 6, 7]);
        assert_eq!(found.vertices().len(), 8);
    }

    #[test]
    fn test_find_loop_closed_on_box() {
        let mesh = create_box(1.0, 1.0, 1.0);
        for direction in [SplitDirection::Horizontal, SplitDirection::Vertical] {
            let found = find_loop(&mesh, CellId::new(0), direction);
            assert!(found.closed);
            assert_eq!(found.cells.len(), 4);
            assert_eq!(found.edges.len(), 4);
            assert_eq!(found.vertices().len(), 8);

            let (rail_a, rail_b) = found.rails();
            assert!(rail_a.iter().all(|i| !rail_b.contains(i)));
        }
    }

    #[test]
    fn test_get_loop_channels() {
        let mesh = strip();
        let cell = CellId::new(0);
        let direction = SplitDirection::Vertical;

        assert_eq!(get_loop(&mesh, cell, direction, LoopChannel::Positions).len(), 8);
        assert_eq!(get_loop(&mesh, cell, direction, LoopChannel::Normals).len(), 8);
        match get_loop(&mesh, cell, direction, LoopChannel::Cells) {
            LoopElements::Cells(cells) => assert_eq!(cells.len(), 3),
            other => panic!("unexpected channel {:?}", other),
        }
    }

    #[test]
    fn test_get_loop_follows_vertex_order_on_box() {
        let mesh = create_box(1.0, 1.0, 1.0);
        let cell = CellId::new(0);
        let direction = SplitDirection::Horizontal;
        let vertices = find_loop(&mesh, cell, direction).vertices();
        assert_eq!(vertices.len(), 8);

        let LoopElements::Positions(positions) =
            get_loop(&mesh, cell, direction, LoopChannel::Positions)
        else {
            panic!("expected positions");
        };
        let LoopElements::Normals(normals) = get_loop(&mesh, cell, direction, LoopChannel::Normals)
        else {
            panic!("expected normals");
        };

        assert_eq!(positions.len(), vertices.len());
        assert_eq!(normals.len(), vertices.len());
        for (k, &i) in vertices.iter().enumerate() {
            assert_eq!(positions[k], mesh.positions[i]);
            assert_eq!(normals[k], mesh.normals[i]);

            // Box corners sit at half extents with normals along the diagonal.
            for c in positions[k].iter() {
                assert_relative_eq!(c.abs(), 0.5);
            }
            assert_relative_eq!(normals[k], positions[k].coords.normalize(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_translate_loop() {
        let mut mesh = create_box(1.0, 1.0, 1.0);
        let cut = split_loop(&mut mesh, CellId::new(0), SplitDirection::Horizontal, 0.5);
        let before: Vec<_> = cut.positions.iter().map(|&i| mesh.positions[i]).collect();

        // The ring of appended halves has the cut on its rail A.
        let found = find_loop(&mesh, cut.seed_created, SplitDirection::Horizontal);
        assert!(found.closed);
        let mut rail = found.rails().0;
        let mut expected = cut.positions.clone();
        rail.sort_unstable();
        expected.sort_unstable();
        assert_eq!(rail, expected);

        let offset = Vector3::new(0.0, 0.0, 0.1);
        translate_loop(&mut mesh, &found, &offset);
        for (k, &i) in cut.positions.iter().enumerate() {
            assert_relative_eq!(mesh.positions[i], before[k] + offset, epsilon = 1e-12);
        }
        assert!(mesh.is_valid());
    }

    fn assert_normals_fresh(mesh: &QuadMesh) {
        let fresh = vertex_normals(&mesh.positions, &mesh.cells);
        for (i, (n, f)) in mesh.normals.iter().zip(&fresh).enumerate() {
            assert!((n - f).norm() < 1e-12, "normal {} is stale: {:?} vs {:?}", i, n, f);
        }
    }

    #[test]
    fn test_translate_loop_refreshes_neighbor_normals() {
        let mut mesh = create_box(1.0, 1.0, 1.0);
        let cut = split_loop(&mut mesh, CellId::new(0), SplitDirection::Horizontal, 0.5);
        let found = find_loop(&mesh, cut.seed_created, SplitDirection::Horizontal);

        translate_loop(&mut mesh, &found, &Vector3::new(0.0, 0.0, 0.4));
        assert_normals_fresh(&mesh);
    }

    #[test]
    fn test_transform_single_corner_refreshes_normals() {
        let mut mesh = create_box(1.0, 1.0, 1.0);
        transform_positions(&mut mesh, &[0], |p| p * 1.5);
        assert_normals_fresh(&mesh);
    }
}
