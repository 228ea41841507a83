//! Coordinate conversion module
//!
//! Provides the tile/window coordinate types used by the pager and the
//! conversion from fractional pixel positions (as produced by zone geometry)
//! to a tile plus the pixel offset inside it.

mod spiral;
mod types;

pub use spiral::SpiralOffsets;
pub use types::{
    FrameCoord, PixelOffset, TileCoord, TileLocation, WindowOffset, SUBFRAMES_PER_FRAME,
    TILE_PIXELS,
};

/// Splits a fractional pixel position into a tile and an in-tile offset.
///
/// # Arguments
///
/// * `pixel_row` - Pixel row measured south from the zone's northern edge
/// * `pixel_col` - Pixel column measured east from the zone's western edge
///
/// Positions north or west of the zone origin produce negative tile
/// coordinates; the in-tile offset is always in `0..TILE_PIXELS`.
#[inline]
pub fn pixel_to_tile(pixel_row: f64, pixel_col: f64) -> TileLocation {
    let size = TILE_PIXELS as i64;
    let row = pixel_row.floor() as i64;
    let col = pixel_col.floor() as i64;

    TileLocation {
        tile: TileCoord {
            row: row.div_euclid(size) as i32,
            col: col.div_euclid(size) as i32,
        },
        pixel: PixelOffset {
            row: row.rem_euclid(size) as u32,
            col: col.rem_euclid(size) as u32,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_tile_origin() {
        let loc = pixel_to_tile(0.0, 0.0);
        assert_eq!(loc.tile, TileCoord::new(0, 0));
        assert_eq!(loc.pixel, PixelOffset { row: 0, col: 0 });
    }

    #[test]
    fn test_pixel_to_tile_remainder() {
        let loc = pixel_to_tile(600.7, 257.2);
        assert_eq!(loc.tile, TileCoord::new(2, 1));
        assert_eq!(loc.pixel, PixelOffset { row: 88, col: 1 });
    }

    #[test]
    fn test_pixel_to_tile_negative_positions() {
        let loc = pixel_to_tile(-1.0, -300.0);
        assert_eq!(loc.tile, TileCoord::new(-1, -2));
        assert_eq!(loc.pixel, PixelOffset { row: 255, col: 212 });
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_pixel_to_tile_reconstructs_pixel(
                row in -100_000.0..100_000.0_f64,
                col in -100_000.0..100_000.0_f64
            ) {
                let loc = pixel_to_tile(row, col);

                prop_assert!(loc.pixel.row < TILE_PIXELS);
                prop_assert!(loc.pixel.col < TILE_PIXELS);

                let rebuilt_row = loc.tile.row as i64 * TILE_PIXELS as i64 + loc.pixel.row as i64;
                let rebuilt_col = loc.tile.col as i64 * TILE_PIXELS as i64 + loc.pixel.col as i64;
                prop_assert_eq!(rebuilt_row, row.floor() as i64);
                prop_assert_eq!(rebuilt_col, col.floor() as i64);
            }

            #[test]
            fn test_offset_roundtrip_property(
                center_row in -10_000i32..10_000,
                center_col in -10_000i32..10_000,
                d_row in -50i32..50,
                d_col in -50i32..50
            ) {
                let center = TileCoord::new(center_row, center_col);
                let offset = WindowOffset::new(d_row, d_col);
                let tile = center.offset_by(offset);
                prop_assert_eq!(tile.offset_from(center), offset);
            }
        }
    }
}
