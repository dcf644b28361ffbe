//! Draw buffers for a real-time renderer.
//!
//! A renderer needs flat attribute and index arrays, not a mesh structure.
//! [`DrawBuffers`] packs a [`TriangleMesh`] into an interleaved vertex array
//! of `f32`s and a `u32` index array that can be uploaded to a GPU as-is,
//! along with a bounding sphere for framing the camera.
//!
//! # Example
//!
//! ```
//! use boxmodel::mesh::create_box;
//! use boxmodel::render::DrawBuffers;
//!
//! let mesh = create_box(1.0, 1.0, 1.0).to_triangles();
//! let buffers = DrawBuffers::from_mesh(&mesh).unwrap();
//! assert_eq!(buffers.indices.len(), 36);
//! assert_eq!(buffers.vertex_bytes().len(), 8 * 24);
//! ```

use bytemuck::{Pod, Zeroable};

use crate::error::{MeshError, Result};
use crate::mesh::TriangleMesh;

/// Interleaved vertex with position and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Unit vertex normal.
    pub normal: [f32; 3],
}

impl Vertex {
    /// Byte stride between consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Vertex and index arrays ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBuffers {
    /// One vertex per mesh position, in position order.
    pub vertices: Vec<Vertex>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
    /// Average of all positions.
    pub center: [f32; 3],
    /// Largest distance from `center` to any position.
    pub radius: f32,
}

impl DrawBuffers {
    /// Build draw buffers from a triangle mesh.
    ///
    /// Positions and normals are shared through the index buffer, so
    /// shading follows the mesh's vertex normals. An empty mesh gets a
    /// unit radius around the origin.
    pub fn from_mesh(mesh: &TriangleMesh) -> Result<Self> {
        mesh.validate()?;
        if mesh.positions.len() > u32::MAX as usize {
            return Err(MeshError::InvalidState(format!(
                "{} positions do not fit a 32-bit index buffer",
                mesh.positions.len()
            )));
        }

        let vertices: Vec<Vertex> = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(p, n)| Vertex {
                position: [p.x as f32, p.y as f32, p.z as f32],
                normal: [n.x as f32, n.y as f32, n.z as f32],
            })
            .collect();

        let indices: Vec<u32> = mesh
            .cells
            .iter()
            .flat_map(|cell| cell.map(|i| i as u32))
            .collect();

        let (center, radius) = if vertices.is_empty() {
            ([0.0, 0.0, 0.0], 1.0)
        } else {
            let mut sum = [0.0_f64; 3];
            for p in &mesh.positions {
                sum[0] += p.x;
                sum[1] += p.y;
                sum[2] += p.z;
            }
            let n = mesh.positions.len() as f64;
            let center = [
                (sum[0] / n) as f32,
                (sum[1] / n) as f32,
                (sum[2] / n) as f32,
            ];

            let max_dist_sq = vertices
                .iter()
                .map(|v| {
                    let dx = v.position[0] - center[0];
                    let dy = v.position[1] - center[1];
                    let dz = v.position[2] - center[2];
                    dx * dx + dy * dy + dz * dz
                })
                .fold(0.0_f32, f32::max);
            (center, max_dist_sq.sqrt())
        };

        Ok(Self {
            vertices,
            indices,
            center,
            radius,
        })
    }

    /// Number of indices to draw.
    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }

    /// The vertex array as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index array as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
