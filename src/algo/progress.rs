//! Progress reporting for multi-pass operations.
//!
//! Subdivision and the authoring scripts run a fixed number of passes. They
//! accept a [`Progress`] so callers such as the CLI can show where they are.
//!
//! # Example
//!
//! ```
//! use boxmodel::algo::progress::Progress;
//! use boxmodel::algo::{subdivide_mesh_with_progress, SubdivideOptions};
//! use boxmodel::mesh::create_box;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let mesh = create_box(1.0, 1.0, 1.0);
//! let options = SubdivideOptions::new(2);
//! subdivide_mesh_with_progress(&mesh, &options, &progress).unwrap();
//! ```

/// A progress callback that receives updates during multi-pass operations.
///
/// The callback receives:
/// - `current`: passes completed so far
/// - `total`: total number of passes
/// - `message`: what the pass was doing
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
