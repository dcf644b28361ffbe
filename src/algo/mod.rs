//! Mesh editing operators.
//!
//! Every operator takes `&mut QuadMesh` first and edits it in place. Cells an
//! operator creates are appended to the cell list and returned as [`CellId`]
//! handles, so the next operation can be chained onto them:
//!
//! - **Split**: cut one cell in two, welded or disjoint
//! - **Loops**: cut an edge loop through a strip or ring of cells, or query one
//! - **Inset / Extrude**: shrink a face inside a ring of new cells and push it out
//! - **Subdivision**: Catmull-Clark
//!
//! None of the editing operators validate their input. Feeding them an
//! out-of-range handle panics on the index; inconsistent winding produces
//! wrong geometry. Use [`QuadMesh::validate`] at API boundaries.
//!
//! # Example
//!
//! ```
//! use boxmodel::algo::{extrude, find_cell_facing, split_loop, SplitDirection};
//! use boxmodel::mesh::create_box;
//! use nalgebra::Vector3;
//!
//! let mut mesh = create_box(1.0, 1.0, 1.0);
//! let front = find_cell_facing(&mesh, &Vector3::z(), |_, _| true).unwrap();
//!
//! let cut = split_loop(&mut mesh, front, SplitDirection::Horizontal, 0.5);
//! assert!(cut.closed);
//!
//! extrude(&mut mesh, front, 0.2, 0.1);
//! assert_eq!(mesh.num_cells(), 10 + 4);
//! ```
//!
//! [`CellId`]: crate::mesh::CellId
//! [`QuadMesh::validate`]: crate::mesh::QuadMesh::validate

mod extrude;
mod inset;
mod loops;
pub mod progress;
mod select;
mod split;
pub mod subdivide;

pub use extrude::{extrude, extrude_disjoint};
pub use inset::{inset, inset_disjoint, Inset};
pub use loops::{
    find_loop, find_neighbor, get_loop, inset_loop, split_loop, transform_positions,
    translate_loop, LoopChannel, LoopElements, LoopSplit, QuadLoop,
};
pub use progress::Progress;
pub use select::find_cell_facing;
pub use split::{
    orient_split, split, split_disjoint, split_horizontal, split_horizontal_disjoint,
    split_vertical, split_vertical_disjoint, SplitDirection,
};
pub use subdivide::{
    subdivide, subdivide_mesh, subdivide_mesh_with_progress, subdivide_with_progress,
    SubdivideOptions, SubdividedMesh,
};
