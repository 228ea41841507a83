//! Coordinate value types for the tile window.

use std::fmt;

/// Edge length of a tile in pixels.
pub const TILE_PIXELS: u32 = 256;

/// Number of tiles along each edge of a frame (a frame is 6×6 subframes).
pub const SUBFRAMES_PER_FRAME: u32 = 6;

/// Absolute tile coordinate within the active zone's tile grid.
///
/// Row 0 is the northern edge of the zone, column 0 the western edge.
/// Coordinates are signed so that window arithmetic around the zone edges
/// never underflows; tiles with negative components are simply invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Tile row (0 = north)
    pub row: i32,
    /// Tile column (0 = west)
    pub col: i32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Express this tile relative to `center`.
    #[inline]
    pub fn offset_from(&self, center: TileCoord) -> WindowOffset {
        WindowOffset {
            row: self.row - center.row,
            col: self.col - center.col,
        }
    }

    /// The tile reached by moving `offset` away from this one.
    #[inline]
    pub fn offset_by(&self, offset: WindowOffset) -> TileCoord {
        TileCoord {
            row: self.row + offset.row,
            col: self.col + offset.col,
        }
    }

    /// Frame containing this tile and the subframe position inside it.
    ///
    /// Returns `None` for tiles with negative components.
    pub fn to_frame(&self) -> Option<FrameCoord> {
        if self.row < 0 || self.col < 0 {
            return None;
        }
        let per = SUBFRAMES_PER_FRAME as i32;
        Some(FrameCoord {
            frame_row: (self.row / per) as u32,
            frame_col: (self.col / per) as u32,
            subframe_row: (self.row % per) as u8,
            subframe_col: (self.col % per) as u8,
        })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Position of a slot relative to the window center.
///
/// For a window of odd size N both components lie in `[-(N-1)/2, (N-1)/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowOffset {
    pub row: i32,
    pub col: i32,
}

impl WindowOffset {
    /// The center of the window.
    pub const CENTER: WindowOffset = WindowOffset { row: 0, col: 0 };

    /// Create a new window offset.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance from the window center (the ring number).
    #[inline]
    pub fn ring(&self) -> u32 {
        self.row.unsigned_abs().max(self.col.unsigned_abs())
    }
}

impl fmt::Display for WindowOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:+}, {:+}]", self.row, self.col)
    }
}

/// Location of a tile within the compressed frame grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameCoord {
    /// Frame row within the zone
    pub frame_row: u32,
    /// Frame column within the zone
    pub frame_col: u32,
    /// Subframe row inside the frame (0-5)
    pub subframe_row: u8,
    /// Subframe column inside the frame (0-5)
    pub subframe_col: u8,
}

/// Pixel position inside a single tile (both components in `0..256`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelOffset {
    pub row: u32,
    pub col: u32,
}

/// A geographic position resolved to a tile and a pixel inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLocation {
    pub tile: TileCoord,
    pub pixel: PixelOffset,
}
