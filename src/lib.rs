//! # Boxmodel
//!
//! Procedural quad-mesh box modeling with Catmull-Clark subdivision.
//!
//! Boxmodel builds shapes the way a modeler does by hand: start from a box,
//! then cut loops, inset and extrude cells, and nudge vertices until the
//! coarse cage has the right silhouette. Catmull-Clark subdivision then
//! turns the cage into a smooth surface, and the result is triangulated
//! for a renderer or written to disk.
//!
//! ## Features
//!
//! - **Quad mesh kernel**: flat `positions` / `normals` / `cells` arrays edited in place
//! - **Editing operators**: splits, loop cuts, insets and extrusions, welded or disjoint
//! - **Loop queries**: walk, read and move whole rings of cells
//! - **Catmull-Clark subdivision**: any number of passes over quads or triangles
//! - **Authoring scripts**: a stylized mask and its body built from boxes
//! - **File formats**: OBJ and PLY in and out, STL out
//!
//! ## Quick Start
//!
//! ```
//! use boxmodel::prelude::*;
//! use nalgebra::Vector3;
//!
//! let mut mesh = create_box(1.0, 1.0, 1.0);
//!
//! // Pull a stub out of the top face
//! let top = find_cell_facing(&mesh, &Vector3::y(), |_, _| true).unwrap();
//! extrude(&mut mesh, top, 0.25, 0.5);
//! assert_eq!(mesh.num_cells(), 10);
//!
//! // Smooth it
//! let smooth = subdivide_mesh(&mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(smooth.num_cells(), 10 * 16 * 2);
//! ```
//!
//! ## Loop Cuts
//!
//! A loop cut follows a ring of quads across opposite edges until it comes
//! back around or runs off an open boundary:
//!
//! ```
//! use boxmodel::prelude::*;
//!
//! let mut mesh = create_box(1.0, 1.0, 1.0);
//! let cut = split_loop(&mut mesh, CellId::new(0), SplitDirection::Horizontal, 0.5);
//! assert!(cut.closed);
//! assert_eq!(mesh.num_cells(), 10);
//! assert_eq!(mesh.num_positions(), 12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mask;
pub mod mesh;
pub mod render;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use boxmodel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        extrude, find_cell_facing, find_loop, inset, orient_split, split, split_loop,
        subdivide_mesh, translate_loop, Progress, SplitDirection, SubdivideOptions,
        SubdividedMesh,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{create_box, create_quad, CellId, QuadMesh, TriangleMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
