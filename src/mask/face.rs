//! The mask face.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use super::{check_fraction, check_positive, facing_cell};
use crate::algo::{extrude, find_loop, orient_split, split_loop, transform_positions};
use crate::error::Result;
use crate::mesh::{create_box, QuadMesh};

/// Proportions of the mask face.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskParams {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
    /// Extent along Z.
    pub depth: f64,
    /// Height of the eye line as a fraction of `height`, from the bottom.
    pub eye_line: f64,
    /// Inset fraction of each eye socket.
    pub eye_inset: f64,
    /// How far the eye sockets are pushed into the face.
    pub eye_depth: f64,
    /// Scale applied to the bottom rim in X and Z.
    pub jaw_taper: f64,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.3,
            depth: 0.7,
            eye_line: 0.6,
            eye_inset: 0.3,
            eye_depth: 0.12,
            jaw_taper: 0.8,
        }
    }
}

impl MaskParams {
    /// Set the box dimensions.
    pub fn with_size(mut self, width: f64, height: f64, depth: f64) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }

    /// Set the eye line fraction.
    pub fn with_eye_line(mut self, eye_line: f64) -> Self {
        self.eye_line = eye_line;
        self
    }

    /// Set the eye socket inset and depth.
    pub fn with_eyes(mut self, inset: f64, depth: f64) -> Self {
        self.eye_inset = inset;
        self.eye_depth = depth;
        self
    }

    /// Set the jaw taper.
    pub fn with_jaw_taper(mut self, jaw_taper: f64) -> Self {
        self.jaw_taper = jaw_taper;
        self
    }

    fn validate(&self) -> Result<()> {
        check_positive("width", self.width)?;
        check_positive("height", self.height)?;
        check_positive("depth", self.depth)?;
        check_fraction("eye_line", self.eye_line)?;
        check_fraction("eye_inset", self.eye_inset)?;
        check_positive("jaw_taper", self.jaw_taper)?;
        Ok(())
    }
}

/// Build the mask face from a box.
///
/// The script:
/// 1. cuts a ring down the middle of the face, splitting it into halves
/// 2. cuts a horizontal ring at the eye line
/// 3. sinks one eye socket into each upper front cell
/// 4. pulls the bottom rim in toward the vertical axis to form the jaw
///
/// The result is a closed quad mesh centred on the origin, ready for
/// subdivision.
///
/// # Example
///
/// ```
/// use boxmodel::mask::{build_mask, MaskParams};
///
/// let mask = build_mask(&MaskParams::default()).unwrap();
/// assert_eq!(mask.num_cells(), 24);
/// ```
pub fn build_mask(params: &MaskParams) -> Result<QuadMesh> {
    params.validate()?;

    let mut mesh = create_box(params.width, params.height, params.depth);
    let eye_y = -0.5 * params.height + params.eye_line * params.height;

    // Centre seam
    let front = facing_cell(&mesh, Vector3::z(), "front face", |_| true)?;
    let (direction, t) = orient_split(&mesh, front, &Vector3::x(), 0.5);
    let seam = split_loop(&mut mesh, front, direction, t);
    debug!("Centre seam: {} cells", seam.created.len());

    // Eye line
    let front_left = facing_cell(&mesh, Vector3::z(), "left half of the face", |c| c.x < 0.0)?;
    let (direction, t) = orient_split(&mesh, front_left, &Vector3::y(), params.eye_line);
    let eye_ring = split_loop(&mut mesh, front_left, direction, t);
    debug!("Eye line at y = {:.3}: {} cells", eye_y, eye_ring.created.len());

    // Eye sockets
    for side in [-1.0, 1.0] {
        let eye = facing_cell(&mesh, Vector3::z(), "eye cell", |c| {
            c.x * side > 0.0 && c.y > eye_y
        })?;
        extrude(&mut mesh, eye, params.eye_inset, -params.eye_depth);
    }

    // Jaw
    let lower = facing_cell(&mesh, Vector3::z(), "lower face", |c| c.y < eye_y)?;
    let (direction, _) = orient_split(&mesh, lower, &Vector3::y(), 0.5);
    let jaw_loop = find_loop(&mesh, lower, direction);
    let (rail_a, rail_b) = jaw_loop.rails();
    let rim = if mean_y(&mesh, &rail_a) <= mean_y(&mesh, &rail_b) {
        rail_a
    } else {
        rail_b
    };
    let taper = params.jaw_taper;
    transform_positions(&mut mesh, &rim, |p| {
        Point3::new(p.x * taper, p.y, p.z * taper)
    });
    debug!("Jaw rim: {} positions scaled by {}", rim.len(), taper);

    mesh.recompute_normals();
    mesh.validate()?;
    Ok(mesh)
}

fn mean_y(mesh: &QuadMesh, indices: &[usize]) -> f64 {
    let sum: f64 = indices.iter().map(|&i| mesh.positions[i].y).sum();
    sum / indices.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::find_neighbor;
    use crate::error::MeshError;
    use approx::assert_relative_eq;

    fn is_closed(mesh: &QuadMesh) -> bool {
        mesh.cells.iter().all(|cell| {
            (0..4).all(|k| find_neighbor(mesh, cell[k], cell[(k + 1) % 4]).is_some())
        })
    }

    #[test]
    fn test_default_mask_counts() {
        let mask = build_mask(&MaskParams::default()).unwrap();
        // 6 box cells, a 4-cell seam ring, a 6-cell eye ring, two extrusions
        assert_eq!(mask.num_cells(), 6 + 4 + 6 + 8);
        assert_eq!(mask.num_positions(), 8 + 4 + 6 + 8);
        assert!(mask.is_valid());
        assert!(is_closed(&mask));
    }

    #[test]
    fn test_eye_sockets_are_sunk() {
        let params = MaskParams::default();
        let mask = build_mask(&params).unwrap();
        let socket_z = 0.5 * params.depth - params.eye_depth;

        let sunk: Vec<_> = mask
            .positions
            .iter()
            .filter(|p| (p.z - socket_z).abs() < 1e-9)
            .collect();
        assert_eq!(sunk.len(), 8);
        assert_eq!(sunk.iter().filter(|p| p.x < 0.0).count(), 4);
        let eye_y = -0.5 * params.height + params.eye_line * params.height;
        assert!(sunk.iter().all(|p| p.y > eye_y));
    }

    #[test]
    fn test_jaw_is_tapered() {
        let params = MaskParams::default();
        let mask = build_mask(&params).unwrap();
        let bottom = -0.5 * params.height;

        let rim: Vec<_> = mask
            .positions
            .iter()
            .filter(|p| p.y == bottom)
            .collect();
        assert_eq!(rim.len(), 6);
        for p in rim {
            assert!(p.x.abs() <= 0.5 * params.width * params.jaw_taper + 1e-9);
            assert!(p.z.abs() <= 0.5 * params.depth * params.jaw_taper + 1e-9);
        }

        // The top is untouched
        let (min, max) = mask.bounding_box().unwrap();
        assert_relative_eq!(max.x, 0.5 * params.width);
        assert_relative_eq!(min.x, -0.5 * params.width);
    }

    #[test]
    fn test_mask_normals_are_unit() {
        let mask = build_mask(&MaskParams::default()).unwrap();
        for n in &mask.normals {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rejects_bad_params() {
        let result = build_mask(&MaskParams::default().with_eye_line(1.5));
        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter { name: "eye_line", .. })
        ));

        let result = build_mask(&MaskParams::default().with_size(0.0, 1.0, 1.0));
        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter { name: "width", .. })
        ));
    }
}
