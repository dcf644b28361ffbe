//! Error types for boxmodel.
//!
//! The editing kernel itself does not validate its input; these errors are
//! raised at the API boundary (subdivision, validation, file I/O).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no cells.
    #[error("mesh has no cells")]
    EmptyMesh,

    /// A cell references a position index outside the position list.
    #[error("cell {cell} references invalid position index {position}")]
    InvalidPositionIndex {
        /// The cell index.
        cell: usize,
        /// The invalid position index.
        position: usize,
    },

    /// A cell repeats a position index.
    #[error("cell {cell} is degenerate (repeats position {position})")]
    DegenerateCell {
        /// The cell index.
        cell: usize,
        /// The repeated position index.
        position: usize,
    },

    /// The normal list is not index-aligned with the position list.
    #[error("mesh has {normals} normals for {positions} positions")]
    NormalCountMismatch {
        /// Number of positions.
        positions: usize,
        /// Number of normals.
        normals: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
