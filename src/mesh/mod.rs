//! Core mesh data structures.
//!
//! This module provides the indexed quad mesh that every editing operator
//! works on, plus the triangle mesh handed to renderers and file writers.
//!
//! # Overview
//!
//! The primary type is [`QuadMesh`]: flat `positions`, index-aligned
//! `normals`, and `cells` of four position indices in counter-clockwise
//! order. Adjacency is implicit; two cells are neighbors when they hold the
//! same edge in opposite directions.
//!
//! # Construction
//!
//! Meshes usually start from [`create_box`] and are then edited in place by
//! the operators in [`crate::algo`]:
//!
//! ```
//! use boxmodel::mesh::{create_box, merge_positions};
//!
//! let mut mesh = create_box(1.0, 1.0, 1.0);
//! assert_eq!(merge_positions(&mut mesh), 0);
//! assert_eq!(mesh.num_positions(), 8);
//! ```

mod builder;
mod index;
mod normals;
mod quad;
mod triangulate;
mod weld;

pub use builder::{create_box, create_quad};
pub use index::CellId;
pub use normals::{face_normal, lerp_normal, recompute_normals_at, vertex_normals};
pub use quad::{lerp, QuadMesh, TriangleMesh};
pub use triangulate::quads_to_tris;
pub use weld::merge_positions;
