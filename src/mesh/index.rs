//! Cell handles.
//!
//! Positions are addressed by plain `usize` indices, exactly as they appear
//! inside cells. Cells get a small newtype so that operators can hand back
//! the cells they create without aliasing into the cell list.

use std::fmt::{self, Debug, Display};

/// A handle to a cell (quad face) of a [`QuadMesh`](super::QuadMesh).
///
/// The handle is just the cell's position in `QuadMesh::cells`. Editing
/// operators only append or rewrite cells in place, so handles stay valid for
/// the lifetime of a mesh.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CellId(usize);

impl CellId {
    /// Create a handle from a raw cell index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw cell index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C({})", self.0)
    }
}

impl Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for CellId {
    fn from(v: usize) -> Self {
        Self::new(v)
    }
}

impl From<CellId> for usize {
    fn from(id: CellId) -> Self {
        id.index()
    }
}
