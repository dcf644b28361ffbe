//! Wavefront OBJ format support.
//!
//! Only the geometry records are handled: `v`, `vn` and `f`. Texture
//! coordinates, groups and materials are skipped on load and never written.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use super::{quads_from_polygons, MeshData};
use crate::error::{MeshError, Result};
use crate::mesh::QuadMesh;

/// Load a quad mesh from an OBJ file.
///
/// Every face must have exactly four corners. Normals in the file are
/// ignored and recomputed from the geometry.
///
/// # Example
///
/// ```no_run
/// use boxmodel::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<QuadMesh> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let parse_error = |line_number: usize, message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: format!("line {}: {}", line_number, message),
    };

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut polygons: Vec<Vec<usize>> = Vec::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_index + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let coords: Vec<f64> = tokens
                    .take(3)
                    .map(|t| t.parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| parse_error(line_number, "invalid vertex coordinate"))?;
                if coords.len() != 3 {
                    return Err(parse_error(line_number, "vertex needs three coordinates"));
                }
                positions.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let polygon = tokens
                    .map(|t| resolve_index(t, positions.len()))
                    .collect::<Option<Vec<usize>>>()
                    .ok_or_else(|| parse_error(line_number, "invalid face index"))?;
                polygons.push(polygon);
            }
            _ => {}
        }
    }

    let cells = quads_from_polygons(path, polygons, positions.len())?;
    Ok(QuadMesh::from_quads(positions, cells))
}

/// Turn an OBJ face token (`7`, `7/1`, `7//3`, `-1`) into a 0-based index.
fn resolve_index(token: &str, num_positions: usize) -> Option<usize> {
    let index: i64 = token.split('/').next()?.parse().ok()?;
    if index > 0 {
        Some(index as usize - 1)
    } else if index < 0 {
        num_positions.checked_sub(index.unsigned_abs() as usize)
    } else {
        None
    }
}

/// Save a mesh to an OBJ file.
///
/// Polygons are written as-is, so quads stay quads. Each face corner
/// references the normal with the same index as its position.
pub fn save<M: MeshData + ?Sized, P: AsRef<Path>>(mesh: &M, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Generated by boxmodel")?;
    for p in mesh.positions() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in mesh.normals() {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for polygon in mesh.polygons() {
        write!(writer, "f")?;
        for &i in polygon {
            write!(writer, " {0}//{0}", i + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
