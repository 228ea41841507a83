//! Raster sources: turning tile coordinates into pixels.
//!
//! The pager knows nothing about map files. It asks a [`RasterSource`]
//! whether a tile exists and, when it has a free resource for it, asks the
//! source to fill that resource.
//!
//! ```text
//! TilePager ── is_valid_tile / materialize / release ──► RasterSource
//!                                                          │
//!                                  RpfRasterSource ◄───────┘
//!                                    │  FrameStore::frame()
//!                                    │  FrameDecoder::decode_into()   (indices)
//!                                    │  Palette::resolve_into()       (RGB)
//!                                    ▼
//!                               TileResource::upload()
//! ```
//!
//! Decode failures never reach the pager. A tile whose frame or subframe
//! cannot be decoded is shown as background and a warning is logged.

mod buffers;
mod store;

pub use store::{FrameStore, InMemoryFrameStore, SyntheticFrameStore, DEFAULT_SYNTHETIC_FRAMES};

use image::{Rgb, RgbImage};
use tracing::{debug, info, warn};

use crate::coord::{TileCoord, TILE_PIXELS};
use crate::pool::{TileFormat, TileResource};
use crate::rpf::{DecodeStatus, FrameDecoder, Palette};
use crate::zone::Zone;
use buffers::DecodeBuffers;

/// Default number of decoded tiles retained by a source (one 3×3 window).
pub const DEFAULT_DECODE_BUFFERS: usize = 9;

/// How a resource was filled by [`RasterSource::materialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Decoded from compressed frame data
    Decoded,
    /// Resolved from indices retained from an earlier decode
    Cached,
    /// Subframe is masked; filled with background
    Masked,
    /// Tile could not be decoded; filled with background
    Blank,
}

/// Producer of tile pixels for the pager.
pub trait RasterSource {
    /// Whether `tile` lies inside the source's current tile grid.
    fn is_valid_tile(&self, tile: TileCoord) -> bool;

    /// Fill `target` with the pixels of `tile`.
    ///
    /// Must always leave `target` holding a full tile, even when the data
    /// behind `tile` is unusable.
    fn materialize(&mut self, tile: TileCoord, target: &mut dyn TileResource) -> FillOutcome;

    /// The pager no longer displays `tile`.
    fn release(&mut self, tile: TileCoord);
}

/// Configuration for [`RpfRasterSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Decoded tiles kept for re-resolution without decoding
    pub decode_buffers: usize,
    /// Palette slot used when resolving colors
    pub palette_slot: usize,
    /// Color for background and unmapped indices
    pub background: [u8; 3],
    /// Expand block rows in parallel
    pub parallel_decode: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            decode_buffers: DEFAULT_DECODE_BUFFERS,
            palette_slot: 0,
            background: [0, 0, 0],
            parallel_decode: true,
        }
    }
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decode_buffers(mut self, count: usize) -> Self {
        self.decode_buffers = count;
        self
    }

    pub fn with_palette_slot(mut self, slot: usize) -> Self {
        self.palette_slot = slot;
        self
    }

    pub fn with_background(mut self, color: [u8; 3]) -> Self {
        self.background = color;
        self
    }

    pub fn with_parallel_decode(mut self, parallel: bool) -> Self {
        self.parallel_decode = parallel;
        self
    }
}

/// Counters for a source's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub decodes: u64,
    pub cache_hits: u64,
    pub masked: u64,
    pub blank_fills: u64,
}

/// Raster source over compressed raster product frames.
///
/// Holds the active zone, decodes subframes on demand and resolves them
/// through the selected palette slot. Frames without that slot fall back to
/// a grayscale table.
pub struct RpfRasterSource<S> {
    store: S,
    decoder: FrameDecoder,
    zone: Option<Zone>,
    buffers: DecodeBuffers,
    palette_slot: usize,
    fallback: Palette,
    background: [u8; 3],
    rgb: RgbImage,
    stats: SourceStats,
}

impl<S: FrameStore> RpfRasterSource<S> {
    pub fn new(store: S, config: SourceConfig) -> Self {
        Self {
            store,
            decoder: FrameDecoder::new().with_parallel(config.parallel_decode),
            zone: None,
            buffers: DecodeBuffers::new(config.decode_buffers),
            palette_slot: config.palette_slot,
            fallback: Palette::grayscale(),
            background: config.background,
            rgb: RgbImage::new(TILE_PIXELS, TILE_PIXELS),
            stats: SourceStats::default(),
        }
    }

    /// Switch to another zone (or to none).
    ///
    /// Retained decodes belong to the previous zone's grid and are dropped,
    /// and the frame store is told about the change.
    /// Callers are expected to flush the pager first.
    pub fn set_zone(&mut self, zone: Option<Zone>) {
        self.buffers.release_all();
        self.store.zone_changed(zone.as_ref());
        match &zone {
            Some(z) => info!(zone = %z.name, scale = %z.scale, "active zone changed"),
            None => info!("no active zone"),
        }
        self.zone = zone;
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    /// Select the palette slot for subsequent fills; returns the previous slot.
    ///
    /// Resources already on screen keep their colors until they are
    /// materialized again (see `TilePager::repaint`).
    pub fn set_palette_slot(&mut self, slot: usize) -> usize {
        let previous = std::mem::replace(&mut self.palette_slot, slot);
        debug!(previous, slot, "palette slot changed");
        previous
    }

    pub fn palette_slot(&self) -> usize {
        self.palette_slot
    }

    pub fn background(&self) -> [u8; 3] {
        self.background
    }

    pub fn stats(&self) -> SourceStats {
        self.stats
    }

    /// Number of tiles whose decoded indices are retained.
    pub fn retained_count(&self) -> usize {
        self.buffers.assigned_count()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: FrameStore> RasterSource for RpfRasterSource<S> {
    fn is_valid_tile(&self, tile: TileCoord) -> bool {
        self.zone.as_ref().is_some_and(|zone| zone.is_valid_tile(tile))
    }

    fn materialize(&mut self, tile: TileCoord, target: &mut dyn TileResource) -> FillOutcome {
        let Self {
            store,
            decoder,
            zone,
            buffers,
            palette_slot,
            fallback,
            background,
            rgb,
            stats,
        } = self;
        let background = *background;

        let location = zone
            .as_ref()
            .filter(|zone| zone.is_valid_tile(tile))
            .zip(tile.to_frame());
        let Some((zone, at)) = location else {
            warn!(tile = %tile, "tile outside active zone, filling blank");
            stats.blank_fills += 1;
            upload_blank(rgb, background, target);
            return FillOutcome::Blank;
        };

        let Some(frame) = store.frame(zone, at.frame_row, at.frame_col) else {
            warn!(
                tile = %tile,
                zone = %zone.name,
                frame_row = at.frame_row,
                frame_col = at.frame_col,
                "frame not available, filling blank"
            );
            buffers.release(tile);
            stats.blank_fills += 1;
            upload_blank(rgb, background, target);
            return FillOutcome::Blank;
        };

        let palette = match frame.clut(*palette_slot) {
            Some(palette) => palette,
            None => {
                debug!(tile = %tile, slot = *palette_slot, "palette slot missing, using grayscale");
                &*fallback
            }
        };

        if let Some(indices) = buffers.get(tile) {
            palette.resolve_into(indices, background, rgb);
            target.upload(rgb, TileFormat::RGB_256);
            stats.cache_hits += 1;
            return FillOutcome::Cached;
        }

        let (indices, retained) = buffers.checkout(tile);
        match decoder.decode_into(frame, at.subframe_row, at.subframe_col, indices) {
            Ok(status) => {
                palette.resolve_into(indices, background, rgb);
                target.upload(rgb, TileFormat::RGB_256);
                match status {
                    DecodeStatus::Decoded => {
                        stats.decodes += 1;
                        FillOutcome::Decoded
                    }
                    DecodeStatus::Masked => {
                        stats.masked += 1;
                        FillOutcome::Masked
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, tile = %tile, zone = %zone.name, "subframe decode failed, filling blank");
                if retained {
                    buffers.release(tile);
                }
                stats.blank_fills += 1;
                upload_blank(rgb, background, target);
                FillOutcome::Blank
            }
        }
    }

    fn release(&mut self, tile: TileCoord) {
        self.buffers.release(tile);
    }
}

fn upload_blank(rgb: &mut RgbImage, background: [u8; 3], target: &mut dyn TileResource) {
    for pixel in rgb.pixels_mut() {
        *pixel = Rgb(background);
    }
    target.upload(rgb, TileFormat::RGB_256);
}
