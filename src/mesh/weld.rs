//! Welding of coincident positions.

use tracing::debug;

use super::quad::QuadMesh;

/// Merge positions whose coordinates are exactly equal.
///
/// For every pair of identical positions the higher-indexed one is deleted
/// and all cell references to it are rewritten to the surviving lower index.
/// Indices above a deleted position shift down so the array stays dense.
/// Normals are recomputed from the welded topology afterwards.
///
/// Comparison is exact (no tolerance) and the scan is quadratic, which is
/// fine for the small hand-authored meshes this kernel targets.
///
/// Returns the number of positions removed.
pub fn merge_positions(mesh: &mut QuadMesh) -> usize {
    let before = mesh.positions.len();

    let mut i = 0;
    while i < mesh.positions.len() {
        let mut j = i + 1;
        while j < mesh.positions.len() {
            if mesh.positions[j] == mesh.positions[i] {
                // Do not advance: the next candidate has shifted into slot j.
                mesh.replace_position(j, i);
            } else {
                j += 1;
            }
        }
        i += 1;
    }

    mesh.recompute_normals();

    let removed = before - mesh.positions.len();
    debug!(
        removed,
        remaining = mesh.positions.len(),
        "merged coincident positions"
    );
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn disjoint_quads() -> QuadMesh {
        // Two quads sharing the edge x = 1, stored without sharing positions.
        QuadMesh::from_quads(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2, 3], [4, 5, 6, 7]],
        )
    }

    #[test]
    fn test_merge_disjoint_quads() {
        let mut mesh = disjoint_quads();
        let removed = merge_positions(&mut mesh);

        assert_eq!(removed, 2);
        assert_eq!(mesh.num_positions(), 6);
        assert_eq!(mesh.normals.len(), 6);
        assert_eq!(mesh.cells, vec![[0, 1, 2, 3], [1, 4, 5, 2]]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut mesh = disjoint_quads();
        merge_positions(&mut mesh);
        let welded = mesh.clone();

        assert_eq!(merge_positions(&mut mesh), 0);
        assert_eq!(mesh, welded);
    }

    #[test]
    fn test_merge_triple_coincidence() {
        let mut mesh = QuadMesh::from_quads(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2, 3], [5, 1, 2, 3]],
        );
        mesh.normals = vec![Vector3::z(); 6];

        assert_eq!(merge_positions(&mut mesh), 2);
        assert_eq!(mesh.cells[1], [0, 1, 2, 3]);
    }

    #[test]
    fn test_near_coincident_positions_are_kept() {
        let mut mesh = disjoint_quads();
        mesh.positions[4].x += 1e-9;
        assert_eq!(merge_positions(&mut mesh), 1);
        assert_eq!(mesh.num_positions(), 7);
    }
}
