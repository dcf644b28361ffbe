//! STL (stereolithography) format support.
//!
//! STL stores independent triangles with a facet normal each. Meshes are
//! fan-triangulated on the way out; there is no loader because STL cannot
//! describe quads.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::MeshData;
use crate::error::{MeshError, Result};

/// Save a mesh to a binary STL file.
///
/// Facet normals are computed from each triangle's winding.
///
/// # Example
///
/// ```no_run
/// use boxmodel::io::stl;
/// use boxmodel::mesh::create_box;
///
/// let mesh = create_box(1.0, 1.0, 1.0);
/// stl::save(&mesh, "box.stl").unwrap();
/// ```
pub fn save<M: MeshData + ?Sized, P: AsRef<Path>>(mesh: &M, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let positions = mesh.positions();
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .iter()
        .map(|f| {
            let p0 = &positions[f[0]];
            let p1 = &positions[f[1]];
            let p2 = &positions[f[2]];

            let n = (p1 - p0).cross(&(p2 - p0)).normalize();

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::create_box;

    #[test]
    fn test_save_box() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("box.stl");

        save(&create_box(1.0, 1.0, 1.0), &path).unwrap();

        let mut file = File::open(&path).unwrap();
        let stl = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(stl.faces.len(), 12);
        assert_eq!(stl.vertices.len(), 8);
    }
}
