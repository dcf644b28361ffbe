//! Mesh-authoring scripts.
//!
//! Each script is a fixed sequence of kernel operations that turns a box into
//! one piece of the stylized mask scene. Cells are located structurally
//! (by facing direction, position relative to a cut, or loop membership)
//! rather than by hard-coded indices, so the scripts keep working when a
//! parameter changes the proportions.
//!
//! - [`build_mask`]: the face, with a centre seam, eye sockets and a tapered jaw
//! - [`build_mask_body`]: the shoulders and neck the mask sits on
//! - [`build_scene`]: both, subdivided and stacked into one renderable mesh
//!
//! # Example
//!
//! ```
//! use boxmodel::mask::{build_scene, SceneParams};
//!
//! let scene = build_scene(&SceneParams::default().with_subdivisions(1)).unwrap();
//! assert!(scene.num_cells() > 0);
//! ```

mod body;
mod face;
mod scene;

pub use body::{build_mask_body, MaskBodyParams};
pub use face::{build_mask, MaskParams};
pub use scene::{build_scene, build_scene_with_progress, SceneParams};

use nalgebra::{Point3, Vector3};

use crate::algo::find_cell_facing;
use crate::error::{MeshError, Result};
use crate::mesh::{CellId, QuadMesh};

/// Reject non-positive or non-finite sizes.
fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_param(name, value, "must be positive"))
    }
}

/// Reject fractions outside the open interval `(0, 1)`.
fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_param(name, value, "must lie in (0, 1)"))
    }
}

/// Find a cell facing `direction` whose centroid satisfies `accept`.
fn facing_cell<F>(mesh: &QuadMesh, direction: Vector3<f64>, what: &str, accept: F) -> Result<CellId>
where
    F: Fn(&Point3<f64>) -> bool,
{
    find_cell_facing(mesh, &direction, |m, id| accept(&m.cell_centroid(id)))
        .ok_or_else(|| MeshError::InvalidState(format!("no cell found for {}", what)))
}
