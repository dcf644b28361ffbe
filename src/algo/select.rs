//! Cell selection by orientation.

use nalgebra::Vector3;

use crate::mesh::{CellId, QuadMesh};

/// Find the cell whose face normal points most nearly along `direction`.
///
/// Only cells accepted by `predicate` are considered, and only those facing
/// at least partly toward `direction`. Ties go to the lowest cell index.
///
/// # Example
///
/// ```
/// use boxmodel::algo::find_cell_facing;
/// use boxmodel::mesh::create_box;
/// use nalgebra::Vector3;
///
/// let mesh = create_box(1.0, 1.0, 1.0);
/// let top = find_cell_facing(&mesh, &Vector3::y(), |_, _| true).unwrap();
/// assert!(mesh.cell_centroid(top).y > 0.0);
/// ```
pub fn find_cell_facing<P>(mesh: &QuadMesh, direction: &Vector3<f64>, predicate: P) -> Option<CellId>
where
    P: Fn(&QuadMesh, CellId) -> bool,
{
    let direction = direction.normalize();
    let mut best: Option<(CellId, f64)> = None;

    for id in mesh.cell_ids().filter(|&id| predicate(mesh, id)) {
        let alignment = mesh.cell_normal(id).dot(&direction);
        if alignment <= 0.0 {
            continue;
        }
        if best.map_or(true, |(_, score)| alignment > score) {
            best = Some((id, alignment));
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::create_box;

    #[test]
    fn test_find_each_box_face() {
        let mesh = create_box(1.0, 2.0, 3.0);
        let axes = [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ];

        let mut found = Vec::new();
        for axis in axes {
            let cell = find_cell_facing(&mesh, &axis, |_, _| true).unwrap();
            let centroid = mesh.cell_centroid(cell);
            assert!(centroid.coords.dot(&axis) > 0.0);
            found.push(cell);
        }
        found.sort_by_key(|c| c.index());
        found.dedup();
        assert_eq!(found.len(), 6);
    }

    #[test]
    fn test_predicate_filters() {
        let mesh = create_box(1.0, 1.0, 1.0);
        let none = find_cell_facing(&mesh, &Vector3::y(), |m, id| m.cell_centroid(id).y < 0.0);
        assert!(none.is_none());
    }
}
