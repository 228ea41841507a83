//! Pager configuration and errors.

use thiserror::Error;

use crate::window::WindowError;

/// Default window edge length (25 resident tiles).
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Errors from building or resizing a pager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagerError {
    #[error("window size must be odd and greater than zero, got {0}")]
    InvalidWindowSize(usize),
}

impl From<WindowError> for PagerError {
    fn from(err: WindowError) -> Self {
        match err {
            WindowError::InvalidSize(size) => PagerError::InvalidWindowSize(size),
        }
    }
}

/// Configuration for [`TilePager`](super::TilePager).
///
/// # Example
///
/// ```
/// use rastermap::pager::PagerConfig;
///
/// let config = PagerConfig::new().with_window_size(7);
/// assert_eq!(config.capacity(), 49);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// Window edge length in tiles (odd)
    pub window_size: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl PagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Number of slots (and pooled resources) for this window size.
    pub fn capacity(&self) -> usize {
        self.window_size * self.window_size
    }

    pub fn validate(&self) -> Result<(), PagerError> {
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(PagerError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}
