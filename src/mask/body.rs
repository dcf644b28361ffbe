//! The shoulders and neck under the mask.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use super::{check_fraction, check_positive, facing_cell};
use crate::algo::{extrude, orient_split, split_loop, transform_positions};
use crate::error::Result;
use crate::mesh::{create_box, QuadMesh};

/// Proportions of the mask body.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBodyParams {
    /// Shoulder width along X.
    pub width: f64,
    /// Torso height along Y.
    pub height: f64,
    /// Torso depth along Z.
    pub depth: f64,
    /// Inset fraction of the top face that becomes the neck.
    pub neck_inset: f64,
    /// How far the neck rises above the shoulders.
    pub neck_height: f64,
    /// How far the shoulder corners are lowered.
    pub shoulder_drop: f64,
}

impl Default for MaskBodyParams {
    fn default() -> Self {
        Self {
            width: 1.6,
            height: 0.5,
            depth: 0.8,
            neck_inset: 0.35,
            neck_height: 0.45,
            shoulder_drop: 0.1,
        }
    }
}

impl MaskBodyParams {
    /// Set the torso dimensions.
    pub fn with_size(mut self, width: f64, height: f64, depth: f64) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }

    /// Set the neck inset and height.
    pub fn with_neck(mut self, inset: f64, height: f64) -> Self {
        self.neck_inset = inset;
        self.neck_height = height;
        self
    }

    /// Set the shoulder drop.
    pub fn with_shoulder_drop(mut self, drop: f64) -> Self {
        self.shoulder_drop = drop;
        self
    }

    fn validate(&self) -> Result<()> {
        check_positive("width", self.width)?;
        check_positive("height", self.height)?;
        check_positive("depth", self.depth)?;
        check_fraction("neck_inset", self.neck_inset)?;
        check_positive("neck_height", self.neck_height)?;
        Ok(())
    }
}

/// Build the shoulders and neck from a box.
///
/// The top face is extruded upward into a neck, a ring is cut halfway up
/// the neck walls, and the four top corners of the torso are lowered to
/// slope the shoulders.
pub fn build_mask_body(params: &MaskBodyParams) -> Result<QuadMesh> {
    params.validate()?;

    let mut mesh = create_box(params.width, params.height, params.depth);

    let top = facing_cell(&mesh, Vector3::y(), "top face", |_| true)?;
    let shoulders = *mesh.cell(top);
    let neck = extrude(&mut mesh, top, params.neck_inset, params.neck_height);

    let wall = neck.ring[0];
    let (direction, t) = orient_split(&mesh, wall, &Vector3::y(), 0.5);
    let ring = split_loop(&mut mesh, wall, direction, t);
    debug!(
        "Neck ring: {} cells, closed = {}",
        ring.created.len(),
        ring.closed
    );

    let drop = params.shoulder_drop;
    transform_positions(&mut mesh, &shoulders, |p| Point3::new(p.x, p.y - drop, p.z));

    mesh.recompute_normals();
    mesh.validate()?;
    Ok(mesh)
}
