//! The assembled scene.

use nalgebra::Vector3;
use tracing::{debug, info};

use super::{build_mask, build_mask_body, MaskBodyParams, MaskParams};
use crate::algo::progress::Progress;
use crate::algo::{subdivide_mesh, SubdivideOptions};
use crate::error::{MeshError, Result};
use crate::mesh::TriangleMesh;

/// Everything needed to build the mask scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    /// The mask face.
    pub mask: MaskParams,
    /// The body under it.
    pub body: MaskBodyParams,
    /// Catmull-Clark iterations applied to both pieces.
    pub subdivisions: usize,
    /// Vertical clearance between the bottom of the mask and the top of the body.
    pub gap: f64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            mask: MaskParams::default(),
            body: MaskBodyParams::default(),
            subdivisions: 2,
            gap: 0.05,
        }
    }
}

impl SceneParams {
    /// Set the mask proportions.
    pub fn with_mask(mut self, mask: MaskParams) -> Self {
        self.mask = mask;
        self
    }

    /// Set the body proportions.
    pub fn with_body(mut self, body: MaskBodyParams) -> Self {
        self.body = body;
        self
    }

    /// Set the number of subdivision iterations.
    pub fn with_subdivisions(mut self, subdivisions: usize) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Set the gap between mask and body.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }
}

/// Build the mask and its body, subdivide both, and stack them.
///
/// The body is moved so its highest point sits `gap` below the lowest point
/// of the subdivided mask. Both pieces are triangulated and merged into one
/// mesh without welding.
pub fn build_scene(params: &SceneParams) -> Result<TriangleMesh> {
    build_scene_with_progress(params, &Progress::none())
}

/// [`build_scene`] with a progress callback.
///
/// Reports four stages: mask built, body built, mask subdivided, body
/// subdivided.
pub fn build_scene_with_progress(params: &SceneParams, progress: &Progress) -> Result<TriangleMesh> {
    if params.gap < 0.0 || !params.gap.is_finite() {
        return Err(MeshError::invalid_param("gap", params.gap, "must be >= 0"));
    }
    const STAGES: usize = 4;

    let mask = build_mask(&params.mask)?;
    progress.report(1, STAGES, "Built mask");

    let body = build_mask_body(&params.body)?;
    progress.report(2, STAGES, "Built body");

    let options = SubdivideOptions::new(params.subdivisions);
    let mut scene = subdivide_mesh(&mask, &options)?.into_triangles();
    progress.report(3, STAGES, "Subdivided mask");

    let mut body = subdivide_mesh(&body, &options)?.into_triangles();
    progress.report(4, STAGES, "Subdivided body");

    let (mask_min, _) = scene.bounding_box().ok_or(MeshError::EmptyMesh)?;
    let (_, body_max) = body.bounding_box().ok_or(MeshError::EmptyMesh)?;
    let drop = mask_min.y - params.gap - body_max.y;
    body.translate(&Vector3::new(0.0, drop, 0.0));
    debug!("Body moved by {:.4} along Y", drop);

    scene.append(&body);
    scene.validate()?;

    info!(
        "Scene: {} positions, {} triangles",
        scene.num_positions(),
        scene.num_cells()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_scene_cell_count() {
        let scene = build_scene(&SceneParams::default().with_subdivisions(1)).unwrap();
        // Each quad becomes 4 quads, then 2 triangles each.
        assert_eq!(scene.num_cells(), 2 * 4 * (24 + 14));
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_body_sits_below_mask() {
        let params = SceneParams::default().with_subdivisions(1).with_gap(0.1);
        let scene = build_scene(&params).unwrap();

        let options = SubdivideOptions::new(1);
        let mask = subdivide_mesh(&build_mask(&params.mask).unwrap(), &options)
            .unwrap()
            .into_triangles();
        let (mask_min, _) = mask.bounding_box().unwrap();

        // Everything after the mask's positions belongs to the body.
        let body_top = scene.positions[mask.num_positions()..]
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(body_top, mask_min.y - 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_progress_stages() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let progress = Progress::new(move |_, total, _| {
            assert_eq!(total, 4);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        build_scene_with_progress(&SceneParams::default().with_subdivisions(1), &progress)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_zero_subdivisions_is_rejected() {
        let result = build_scene(&SceneParams::default().with_subdivisions(0));
        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter { name: "iterations", .. })
        ));
    }

    #[test]
    fn test_negative_gap_is_rejected() {
        let result = build_scene(&SceneParams::default().with_gap(-1.0));
        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter { name: "gap", .. })
        ));
    }
}
