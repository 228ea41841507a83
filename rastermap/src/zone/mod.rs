//! Zones: the geographic footprint and tile grid of one resolution level.
//!
//! A zone's grid is measured in frames; every frame holds 6×6 tiles of
//! 256×256 pixels. Positions are mapped to pixels with a fixed
//! degrees-per-pixel interval on each axis, measured from the zone's
//! north-west corner:
//!
//! ```text
//! pixel_row = (northwest_lat - lat) / lat_interval
//! pixel_col = (lon - northwest_lon) / lon_interval
//! tile      = pixel / 256, remainder = pixel offset inside the tile
//! ```

mod catalog;
mod scale;

pub use catalog::ZoneCatalog;
pub use scale::{parse_scale, ScaleLadder, ZoomDirection, ZoomError};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{pixel_to_tile, TileCoord, TileLocation, SUBFRAMES_PER_FRAME, TILE_PIXELS};

/// Largest frame count per grid axis; keeps tile indices within `i32`.
pub const MAX_GRID_FRAMES: u32 = i32::MAX as u32 / SUBFRAMES_PER_FRAME;

/// Errors from zone descriptors and catalogs.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// Degrees-per-pixel intervals must be positive and finite.
    #[error("zone '{0}' has a non-positive pixel interval")]
    InvalidInterval(String),

    /// A zone must contain at least one frame.
    #[error("zone '{0}' has an empty frame grid")]
    EmptyGrid(String),

    /// Frame grid too large to address with tile coordinates.
    #[error("zone '{0}' has too many frames per axis")]
    GridTooLarge(String),

    /// Another zone in the catalog already uses this name.
    #[error("duplicate zone name '{0}'")]
    DuplicateZone(String),

    /// Scale label could not be parsed (expected e.g. "1:250K").
    #[error("unrecognized scale label '{0}'")]
    InvalidScale(String),

    /// Catalog JSON could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One resolution level's coverage rectangle and tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Identifier unique within a catalog (e.g. "tpc-zone2")
    pub name: String,
    /// Scale label shared by all zones of this resolution (e.g. "1:250K")
    pub scale: String,
    /// Latitude of the north-west corner in degrees
    pub northwest_lat: f64,
    /// Longitude of the north-west corner in degrees
    pub northwest_lon: f64,
    /// Degrees of latitude per pixel
    pub lat_interval: f64,
    /// Degrees of longitude per pixel
    pub lon_interval: f64,
    /// Frame rows in the grid
    pub grid_rows: u32,
    /// Frame columns in the grid
    pub grid_cols: u32,
}

impl Zone {
    /// Check the descriptor for usable geometry.
    pub fn validate(&self) -> Result<(), ZoneError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.lat_interval) || !positive(self.lon_interval) {
            return Err(ZoneError::InvalidInterval(self.name.clone()));
        }
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(ZoneError::EmptyGrid(self.name.clone()));
        }
        if self.grid_rows > MAX_GRID_FRAMES || self.grid_cols > MAX_GRID_FRAMES {
            return Err(ZoneError::GridTooLarge(self.name.clone()));
        }
        Ok(())
    }

    /// Tile rows covered by the zone.
    ///
    /// Saturates for grids that [`Zone::validate`] would reject.
    pub fn tile_rows(&self) -> u32 {
        self.grid_rows.saturating_mul(SUBFRAMES_PER_FRAME)
    }

    /// Tile columns covered by the zone.
    pub fn tile_cols(&self) -> u32 {
        self.grid_cols.saturating_mul(SUBFRAMES_PER_FRAME)
    }

    /// Latitude of the southern edge.
    pub fn south_lat(&self) -> f64 {
        self.northwest_lat - self.tile_rows() as f64 * TILE_PIXELS as f64 * self.lat_interval
    }

    /// Longitude of the eastern edge.
    pub fn east_lon(&self) -> f64 {
        self.northwest_lon + self.tile_cols() as f64 * TILE_PIXELS as f64 * self.lon_interval
    }

    /// Whether the position lies inside the zone.
    ///
    /// The northern and western edges are inclusive, the southern and
    /// eastern edges exclusive, so adjacent zones never both claim a point.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat <= self.northwest_lat
            && lat > self.south_lat()
            && lon >= self.northwest_lon
            && lon < self.east_lon()
    }

    /// Whether `tile` lies inside the zone's tile grid.
    pub fn is_valid_tile(&self, tile: TileCoord) -> bool {
        tile.row >= 0
            && tile.col >= 0
            && (tile.row as u32) < self.tile_rows()
            && (tile.col as u32) < self.tile_cols()
    }

    /// Resolve a position to a tile and the pixel inside it.
    ///
    /// Positions outside the zone yield tiles that fail
    /// [`Zone::is_valid_tile`].
    pub fn to_tile_location(&self, lat: f64, lon: f64) -> TileLocation {
        let pixel_row = (self.northwest_lat - lat) / self.lat_interval;
        let pixel_col = (lon - self.northwest_lon) / self.lon_interval;
        pixel_to_tile(pixel_row, pixel_col)
    }

    /// Latitude/longitude of a tile's north-west corner.
    pub fn tile_origin(&self, tile: TileCoord) -> (f64, f64) {
        let span_lat = TILE_PIXELS as f64 * self.lat_interval;
        let span_lon = TILE_PIXELS as f64 * self.lon_interval;
        (
            self.northwest_lat - tile.row as f64 * span_lat,
            self.northwest_lon + tile.col as f64 * span_lon,
        )
    }
}

/// Resolve a position against `zone`.
///
/// Convenience wrapper around [`Zone::to_tile_location`].
#[inline]
pub fn to_tile_coordinate(lat: f64, lon: f64, zone: &Zone) -> TileLocation {
    zone.to_tile_location(lat, lon)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::coord::PixelOffset;

    /// 2×3 frames (12×18 tiles) starting at 50N 10E, 1/256 degree per pixel
    /// so each tile spans exactly one degree.
    pub(crate) fn test_zone(name: &str, scale: &str) -> Zone {
        Zone {
            name: name.to_string(),
            scale: scale.to_string(),
            northwest_lat: 50.0,
            northwest_lon: 10.0,
            lat_interval: 1.0 / 256.0,
            lon_interval: 1.0 / 256.0,
            grid_rows: 2,
            grid_cols: 3,
        }
    }

    #[test]
    fn test_extent() {
        let zone = test_zone("z", "1:250K");
        assert_eq!(zone.tile_rows(), 12);
        assert_eq!(zone.tile_cols(), 18);
        assert!((zone.south_lat() - 38.0).abs() < 1e-9);
        assert!((zone.east_lon() - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_edges() {
        let zone = test_zone("z", "1:250K");
        assert!(zone.contains(50.0, 10.0));
        assert!(zone.contains(38.0001, 27.9999));
        assert!(!zone.contains(38.0, 20.0));
        assert!(!zone.contains(45.0, 28.0));
        assert!(!zone.contains(50.0001, 12.0));
        assert!(!zone.contains(45.0, 9.9999));
    }

    #[test]
    fn test_to_tile_location() {
        let zone = test_zone("z", "1:250K");
        // 2.5 degrees south and 3.25 degrees east of the origin
        let loc = to_tile_coordinate(47.5, 13.25, &zone);
        assert_eq!(loc.tile, TileCoord::new(2, 3));
        assert_eq!(loc.pixel, PixelOffset { row: 128, col: 64 });
    }

    #[test]
    fn test_outside_position_gives_invalid_tile() {
        let zone = test_zone("z", "1:250K");
        let loc = zone.to_tile_location(51.0, 5.0);
        assert!(!zone.is_valid_tile(loc.tile));
    }

    #[test]
    fn test_is_valid_tile_bounds() {
        let zone = test_zone("z", "1:250K");
        assert!(zone.is_valid_tile(TileCoord::new(0, 0)));
        assert!(zone.is_valid_tile(TileCoord::new(11, 17)));
        assert!(!zone.is_valid_tile(TileCoord::new(12, 0)));
        assert!(!zone.is_valid_tile(TileCoord::new(0, 18)));
        assert!(!zone.is_valid_tile(TileCoord::new(-1, 0)));
    }

    #[test]
    fn test_tile_origin() {
        let zone = test_zone("z", "1:250K");
        let (lat, lon) = zone.tile_origin(TileCoord::new(2, 3));
        assert!((lat - 48.0).abs() < 1e-9);
        assert!((lon - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate() {
        let mut zone = test_zone("z", "1:250K");
        assert!(zone.validate().is_ok());

        zone.lat_interval = 0.0;
        assert!(matches!(zone.validate(), Err(ZoneError::InvalidInterval(_))));

        let mut zone = test_zone("z", "1:250K");
        zone.grid_cols = 0;
        assert!(matches!(zone.validate(), Err(ZoneError::EmptyGrid(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        let mut zone = test_zone("z", "1:250K");
        zone.grid_rows = MAX_GRID_FRAMES;
        assert!(zone.validate().is_ok());
        assert!(zone.is_valid_tile(TileCoord::new(i32::MAX - 2, 0)));

        zone.grid_rows = 715_827_883;
        assert!(matches!(zone.validate(), Err(ZoneError::GridTooLarge(_))));

        zone.grid_rows = 2;
        zone.grid_cols = u32::MAX;
        assert!(matches!(zone.validate(), Err(ZoneError::GridTooLarge(_))));
        assert_eq!(zone.tile_cols(), u32::MAX);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_contained_positions_map_to_valid_tiles(
                lat in 38.001..50.0_f64,
                lon in 10.0..27.999_f64
            ) {
                let zone = test_zone("z", "1:250K");
                prop_assert!(zone.contains(lat, lon));
                let loc = zone.to_tile_location(lat, lon);
                prop_assert!(zone.is_valid_tile(loc.tile));
                prop_assert!(loc.pixel.row < TILE_PIXELS);
                prop_assert!(loc.pixel.col < TILE_PIXELS);
            }
        }
    }
}
