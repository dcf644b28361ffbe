//! End-to-end tests of the quad kernel and subdivision through the public API.

use std::collections::BTreeSet;

use approx::assert_relative_eq;
use boxmodel::algo::{
    extrude, inset, split_horizontal, split_vertical, subdivide, subdivide_mesh, SubdivideOptions,
    SubdividedMesh,
};
use boxmodel::io;
use boxmodel::mask::{build_mask, build_scene, MaskParams, SceneParams};
use boxmodel::mesh::{create_box, create_quad, merge_positions, quads_to_tris, CellId, QuadMesh};
use boxmodel::render::DrawBuffers;
use nalgebra::Point3;

fn triangle_area(positions: &[Point3<f64>], [a, b, c]: [usize; 3]) -> f64 {
    0.5 * (positions[b] - positions[a])
        .cross(&(positions[c] - positions[a]))
        .norm()
}

fn total_area(mesh: &QuadMesh) -> f64 {
    mesh.cell_ids().map(|id| mesh.cell_area(id)).sum()
}

// ==================== Box ====================

#[test]
fn test_box_invariant() {
    let mesh = create_box(1.0, 2.0, 3.0);
    assert_eq!(mesh.num_positions(), 8);
    assert_eq!(mesh.num_cells(), 6);
    assert!(mesh.validate().is_ok());

    for (i, p) in mesh.positions.iter().enumerate() {
        for q in &mesh.positions[i + 1..] {
            assert_ne!(p, q);
        }
    }

    let (min, max) = mesh.bounding_box().unwrap();
    assert_eq!(min, Point3::new(-0.5, -1.0, -1.5));
    assert_eq!(max, Point3::new(0.5, 1.0, 1.5));
}

#[test]
fn test_welding_is_idempotent() {
    let mut mesh = create_box(1.0, 1.0, 1.0);
    let before = mesh.clone();

    assert_eq!(merge_positions(&mut mesh), 0);
    assert_eq!(mesh.positions, before.positions);
    assert_eq!(mesh.cells, before.cells);
    for (a, b) in mesh.normals.iter().zip(&before.normals) {
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }
}

// ==================== Operators ====================

#[test]
fn test_split_conservation() {
    for vertical in [true, false] {
        let mut mesh = create_quad(2.0, 3.0);
        let created = if vertical {
            split_vertical(&mut mesh, CellId::new(0), 0.3)
        } else {
            split_horizontal(&mut mesh, CellId::new(0), 0.3)
        };

        assert_eq!(mesh.num_cells(), 2);
        assert_eq!(mesh.num_positions(), 6);
        assert_eq!(mesh.normals.len(), 6);
        assert_eq!(created, CellId::new(1));
        assert_relative_eq!(total_area(&mesh), 6.0, epsilon = 1e-12);
    }
}

#[test]
fn test_inset_conservation() {
    let mut mesh = create_box(1.0, 1.0, 1.0);
    let corners = mesh.cell_positions(CellId::new(1));

    let result = inset(&mut mesh, CellId::new(1), 0.0);
    assert_eq!(mesh.num_positions(), 12);
    assert_eq!(mesh.num_cells(), 10);
    assert_eq!(mesh.cell_positions(result.inner), corners);
}

#[test]
fn test_extrude_zero_distance_matches_inset() {
    let mut inset_mesh = create_box(1.0, 1.0, 1.0);
    let mut extruded = inset_mesh.clone();

    inset(&mut inset_mesh, CellId::new(3), 0.25);
    extrude(&mut extruded, CellId::new(3), 0.25, 0.0);

    assert_eq!(extruded.cells, inset_mesh.cells);
    assert_eq!(extruded.positions, inset_mesh.positions);
}

#[test]
fn test_quads_to_tris_preserves_vertices_and_area() {
    let mesh = build_mask(&MaskParams::default()).unwrap();
    let triangles = quads_to_tris(&mesh.cells);
    assert_eq!(triangles.len(), 2 * mesh.num_cells());

    let quad_set: BTreeSet<usize> = mesh.cells.iter().flatten().copied().collect();
    let tri_set: BTreeSet<usize> = triangles.iter().flatten().copied().collect();
    assert_eq!(quad_set, tri_set);

    // A flat quad is covered exactly by its two triangles.
    let quad = create_quad(2.0, 0.5);
    let tris = quads_to_tris(&quad.cells);
    let area: f64 = tris.iter().map(|&t| triangle_area(&quad.positions, t)).sum();
    assert_relative_eq!(area, 1.0, epsilon = 1e-12);
}

// ==================== Catmull-Clark ====================

#[test]
fn test_catmull_clark_quad_preservation() {
    let mesh = build_mask(&MaskParams::default()).unwrap();
    let k = mesh.num_cells();

    match subdivide_mesh(&mesh, &SubdivideOptions::new(1).quads()).unwrap() {
        SubdividedMesh::Quads(quads) => {
            assert_eq!(quads.num_cells(), 4 * k);
            assert!(quads.validate().is_ok());
        }
        SubdividedMesh::Triangles(_) => panic!("asked for quads"),
    }

    for m in 1..=3u32 {
        let result = subdivide_mesh(&mesh, &SubdivideOptions::new(m as usize)).unwrap();
        assert_eq!(result.num_cells(), 2 * 4usize.pow(m) * k);
    }
}

#[test]
fn test_catmull_clark_planar_quad() {
    let quad = create_quad(2.0, 2.0);
    let result = subdivide(&quad.positions, &quad.cells, &SubdivideOptions::new(3)).unwrap();
    for p in result.positions() {
        assert_eq!(p.z, 0.0);
    }
}

#[test]
fn test_cube_end_to_end() {
    let cube = create_box(1.0, 1.0, 1.0);

    let quads = subdivide_mesh(&cube, &SubdivideOptions::new(1).quads()).unwrap();
    assert_eq!(quads.positions().len(), 26);
    assert_eq!(quads.num_cells(), 24);

    let triangles = subdivide_mesh(&cube, &SubdivideOptions::new(1)).unwrap();
    assert_eq!(triangles.num_cells(), 48);
    assert!(matches!(triangles, SubdividedMesh::Triangles(_)));
}

// ==================== Scene ====================

#[test]
fn test_mask_cage_survives_obj_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.obj");

    let mask = build_mask(&MaskParams::default()).unwrap();
    io::save(&mask, &path).unwrap();
    let loaded = io::load(&path).unwrap();

    assert_eq!(loaded.cells, mask.cells);
    assert_eq!(loaded.positions, mask.positions);
}

#[test]
fn test_scene_to_draw_buffers() {
    let scene = build_scene(&SceneParams::default().with_subdivisions(1)).unwrap();
    let buffers = DrawBuffers::from_mesh(&scene).unwrap();

    assert_eq!(buffers.vertices.len(), scene.num_positions());
    assert_eq!(buffers.indices.len(), 3 * scene.num_cells());
    assert!(buffers.radius > 0.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.stl");
    io::save(&scene, &path).unwrap();
    assert!(path.exists());
}
