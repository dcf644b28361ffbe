//! Mesh file I/O.
//!
//! This module writes finished meshes to common interchange formats and
//! reads quad meshes back for further editing.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Quads kept, normals written as `vn` |
//! | PLY | `.ply` | ✓ | ✓ | ASCII, polygon faces with normals |
//! | STL | `.stl` | ✗ | ✓ | Binary, triangulated |
//!
//! Loading always produces a [`QuadMesh`], so only files made entirely of
//! quads can be read back.
//!
//! # Usage
//!
//! ```no_run
//! use boxmodel::io::{load, save};
//! use boxmodel::mesh::create_box;
//!
//! let mesh = create_box(1.0, 1.0, 1.0);
//! save(&mesh, "box.obj").unwrap();
//!
//! let loaded = load("box.obj").unwrap();
//! assert_eq!(loaded.num_cells(), 6);
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::algo::SubdividedMesh;
use crate::error::{MeshError, Result};
use crate::mesh::{QuadMesh, TriangleMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Read access to a mesh for the writers.
///
/// Implemented by every mesh type the crate produces, so any of them can be
/// handed to [`save`].
pub trait MeshData {
    /// Vertex positions.
    fn positions(&self) -> &[Point3<f64>];

    /// Vertex normals, index-aligned with [`positions`](Self::positions).
    fn normals(&self) -> &[Vector3<f64>];

    /// Polygon corner lists in counter-clockwise order.
    fn polygons(&self) -> Vec<&[usize]>;

    /// Fan-triangulated polygons.
    ///
    /// For quads this is the same `a–c` diagonal split as
    /// [`quads_to_tris`](crate::mesh::quads_to_tris).
    fn triangles(&self) -> Vec<[usize; 3]> {
        let mut triangles = Vec::new();
        for polygon in self.polygons() {
            for k in 1..polygon.len().saturating_sub(1) {
                triangles.push([polygon[0], polygon[k], polygon[k + 1]]);
            }
        }
        triangles
    }
}

impl MeshData for QuadMesh {
    fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    fn polygons(&self) -> Vec<&[usize]> {
        self.cells.iter().map(|c| c.as_slice()).collect()
    }
}

impl MeshData for TriangleMesh {
    fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    fn polygons(&self) -> Vec<&[usize]> {
        self.cells.iter().map(|c| c.as_slice()).collect()
    }

    fn triangles(&self) -> Vec<[usize; 3]> {
        self.cells.clone()
    }
}

impl MeshData for SubdividedMesh {
    fn positions(&self) -> &[Point3<f64>] {
        match self {
            SubdividedMesh::Quads(mesh) => mesh.positions(),
            SubdividedMesh::Triangles(mesh) => mesh.positions(),
        }
    }

    fn normals(&self) -> &[Vector3<f64>] {
        match self {
            SubdividedMesh::Quads(mesh) => MeshData::normals(mesh),
            SubdividedMesh::Triangles(mesh) => MeshData::normals(mesh),
        }
    }

    fn polygons(&self) -> Vec<&[usize]> {
        match self {
            SubdividedMesh::Quads(mesh) => mesh.polygons(),
            SubdividedMesh::Triangles(mesh) => mesh.polygons(),
        }
    }
}

/// Load a quad mesh from a file with automatic format detection.
///
/// Normals are recomputed from the loaded geometry.
pub fn load<P: AsRef<Path>>(path: P) -> Result<QuadMesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Ply => ply::load(path),
        Format::Stl => Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL stores triangles only and cannot be loaded as quads".to_string(),
        }),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<M: MeshData + ?Sized, P: AsRef<Path>>(mesh: &M, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }
}

/// Build the quad list of a loaded file, rejecting anything but quads.
fn quads_from_polygons(
    path: &Path,
    polygons: Vec<Vec<usize>>,
    num_positions: usize,
) -> Result<Vec<[usize; 4]>> {
    let load_error = |message: String| MeshError::LoadError {
        path: path.to_path_buf(),
        message,
    };

    if polygons.is_empty() {
        return Err(load_error("file contains no faces".to_string()));
    }

    polygons
        .into_iter()
        .enumerate()
        .map(|(fi, polygon)| {
            let quad: [usize; 4] = polygon.as_slice().try_into().map_err(|_| {
                load_error(format!("face {} has {} corners, expected 4", fi, polygon.len()))
            })?;
            if let Some(&bad) = quad.iter().find(|&&i| i >= num_positions) {
                return Err(load_error(format!(
                    "face {} references missing vertex {}",
                    fi, bad
                )));
            }
            Ok(quad)
        })
        .collect()
}
