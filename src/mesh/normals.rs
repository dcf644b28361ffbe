//! Face and vertex normals.
//!
//! A face normal is taken from the first three corners of a cell,
//! `normalize((b - a) × (c - b))`. Vertex normals are the normalized sum of the
//! face normals of every cell that references the vertex.
//!
//! Degenerate (zero-area) cells normalize a zero vector and yield NaN
//! components. This is not checked here; see [`QuadMesh::validate`] for the
//! boundary checks.
//!
//! [`QuadMesh::validate`]: super::QuadMesh::validate

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::quad::QuadMesh;

/// Compute the unit normal of a cell from its first three corners.
#[inline]
pub fn face_normal(positions: &[Point3<f64>], cell: &[usize]) -> Vector3<f64> {
    let a = &positions[cell[0]];
    let b = &positions[cell[1]];
    let c = &positions[cell[2]];
    (b - a).cross(&(c - b)).normalize()
}

/// Compute per-position normals by averaging the face normals of adjacent cells.
///
/// Positions not referenced by any cell get a zero normal.
pub fn vertex_normals<C: AsRef<[usize]>>(
    positions: &[Point3<f64>],
    cells: &[C],
) -> Vec<Vector3<f64>> {
    let mut sums = vec![Vector3::zeros(); positions.len()];
    let mut counts = vec![0usize; positions.len()];

    for cell in cells {
        let cell = cell.as_ref();
        let normal = face_normal(positions, cell);
        for &i in cell {
            sums[i] += normal;
            counts[i] += 1;
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| if count == 0 { sum } else { sum.normalize() })
        .collect()
}

/// Interpolate between two unit normals and renormalize.
///
/// Falls back to `a` when the two normals cancel out.
#[inline]
pub fn lerp_normal(a: &Vector3<f64>, b: &Vector3<f64>, t: f64) -> Vector3<f64> {
    a.lerp(b, t).try_normalize(f64::EPSILON).unwrap_or(*a)
}

/// Re-average the normals of a subset of positions.
///
/// Adjacent cells are discovered by a linear scan over the cell list; each
/// cell's face normal is computed at most once per call.
pub fn recompute_normals_at(mesh: &mut QuadMesh, targets: &[usize]) {
    let mut face_cache: HashMap<usize, Vector3<f64>> = HashMap::new();

    for &target in targets {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;

        for (ci, cell) in mesh.cells.iter().enumerate() {
            if !cell.contains(&target) {
                continue;
            }
            let normal = *face_cache
                .entry(ci)
                .or_insert_with(|| face_normal(&mesh.positions, cell));
            sum += normal;
            count += 1;
        }

        if count > 0 {
            mesh.normals[target] = sum.normalize();
        }
    }
}
