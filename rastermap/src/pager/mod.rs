//! Tile pager: keeps a window of decoded tiles around a moving center.
//!
//! Every [`TilePager::update`] runs three ordered phases:
//!
//! ```text
//!   update(center)
//!     │
//!     ├─ 1. evict   occupants now outside the window ──► pool + source.release
//!     ├─ 2. reuse   occupants still inside keep their handle, move to new offset
//!     └─ 3. load    first empty, valid slot in spiral order ──► acquire + materialize
//!                   (at most one per call)
//! ```
//!
//! Phases 1 and 2 are a single pass: every occupant is taken out of the
//! window and tested once against the new bounds, so each handle ends up
//! either back in the window or back in the pool, never both and never
//! neither.
//!
//! Resources only ever move between the [`ResourcePool`] and the
//! [`TileWindow`]. Because the pool is sized to the window's capacity,
//! running out of resources means that invariant was broken and the pager
//! panics.
//!
//! # Example
//!
//! ```
//! use rastermap::coord::TileCoord;
//! use rastermap::pager::{PagerConfig, TilePager};
//! use rastermap::pool::PixelBuffer;
//! use rastermap::rpf::FrameSynth;
//! use rastermap::source::{RpfRasterSource, SourceConfig, SyntheticFrameStore};
//! use rastermap::zone::Zone;
//!
//! let zone = Zone {
//!     name: "demo".to_string(),
//!     scale: "1:250K".to_string(),
//!     northwest_lat: 50.0,
//!     northwest_lon: 10.0,
//!     lat_interval: 1.0 / 256.0,
//!     lon_interval: 1.0 / 256.0,
//!     grid_rows: 1,
//!     grid_cols: 1,
//! };
//! let mut source = RpfRasterSource::new(
//!     SyntheticFrameStore::new(FrameSynth::new()),
//!     SourceConfig::new(),
//! );
//! source.set_zone(Some(zone));
//!
//! let config = PagerConfig::new().with_window_size(3);
//! let mut pager = TilePager::new(config, source, PixelBuffer::new).unwrap();
//!
//! let outcome = pager.update(TileCoord::new(2, 2));
//! assert_eq!(outcome.loaded.map(|l| l.tile), Some(TileCoord::new(2, 2)));
//! assert_eq!(pager.occupied_count() + pager.free_count(), pager.capacity());
//! ```

mod config;

pub use config::{PagerConfig, PagerError, DEFAULT_WINDOW_SIZE};

use tracing::{debug, error, info};

use crate::coord::{SpiralOffsets, TileCoord, WindowOffset};
use crate::pool::{HandleId, ResourcePool, TileResource};
use crate::source::{FillOutcome, RasterSource};
use crate::window::{Occupant, Slot, TileWindow};

/// The tile loaded by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedTile {
    pub tile: TileCoord,
    /// Window position relative to the new center
    pub offset: WindowOffset,
    pub handle: HandleId,
    pub fill: FillOutcome,
}

/// What a single [`TilePager::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Occupants returned to the pool
    pub evicted: usize,
    /// Occupants kept and moved to their new offset
    pub reused: usize,
    /// Tile loaded in this call, if any
    pub loaded: Option<LoadedTile>,
}

/// Cumulative pager counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagerStats {
    pub updates: u64,
    pub loads: u64,
    pub evictions: u64,
    pub blank_fills: u64,
    pub flushes: u64,
    pub repaints: u64,
}

/// Windowed tile cache over a raster source.
pub struct TilePager<R, S> {
    pool: ResourcePool<R>,
    window: TileWindow<R>,
    source: S,
    factory: Box<dyn FnMut() -> R>,
    stats: PagerStats,
}

impl<R: TileResource, S: RasterSource> TilePager<R, S> {
    /// Build a pager whose pool holds one resource per window slot.
    ///
    /// `factory` is kept so the pool can be rebuilt by [`resize`](Self::resize).
    pub fn new(
        config: PagerConfig,
        source: S,
        factory: impl FnMut() -> R + 'static,
    ) -> Result<Self, PagerError> {
        config.validate()?;
        let window = TileWindow::new(config.window_size)?;
        let mut factory: Box<dyn FnMut() -> R> = Box::new(factory);
        let pool = ResourcePool::new(window.capacity(), &mut *factory);

        debug!(
            window_size = config.window_size,
            capacity = window.capacity(),
            "tile pager created"
        );

        Ok(Self {
            pool,
            window,
            source,
            factory,
            stats: PagerStats::default(),
        })
    }

    /// Move the window to `center` and load at most one missing tile.
    ///
    /// # Panics
    ///
    /// Panics if the pool has no resource for an empty slot, which can only
    /// happen if a handle escaped the pool/window pair.
    pub fn update(&mut self, center: TileCoord) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        self.stats.updates += 1;

        if center != self.window.center_tile() {
            let occupants = self.window.drain();
            self.window.set_center_tile(center);

            for occupant in occupants {
                let offset = occupant.tile.offset_from(center);
                if !self.window.is_in_bounds(offset) {
                    self.evict(occupant);
                    outcome.evicted += 1;
                    continue;
                }
                if let Some(duplicate) = self.window.put(offset, occupant.tile, occupant.handle) {
                    error!(tile = %duplicate.tile, "tile resident twice, releasing duplicate");
                    self.evict(duplicate);
                    outcome.evicted += 1;
                }
                outcome.reused += 1;
            }
        }

        outcome.loaded = self.load_next();

        debug_assert_eq!(
            self.window.occupied_count() + self.pool.free_count(),
            self.pool.capacity()
        );
        debug!(
            center = %center,
            evicted = outcome.evicted,
            reused = outcome.reused,
            loaded = ?outcome.loaded.map(|l| l.tile),
            "pager update"
        );
        outcome
    }

    /// Evict every occupant. Returns how many were evicted.
    pub fn flush(&mut self) -> usize {
        let occupants = self.window.drain();
        let count = occupants.len();
        for occupant in occupants {
            self.evict(occupant);
        }
        self.stats.flushes += 1;
        if count > 0 {
            info!(evicted = count, "tile window flushed");
        }
        count
    }

    /// Change the window edge length.
    ///
    /// Every occupant is returned to the current pool before a new pool
    /// sized for the new window is built. The center is kept. On error the
    /// pager is unchanged.
    pub fn resize(&mut self, size: usize) -> Result<(), PagerError> {
        PagerConfig::new().with_window_size(size).validate()?;
        let previous = self.window.set_size(size)?;
        let evicted = previous.len();
        for occupant in previous {
            self.evict(occupant);
        }
        self.pool = ResourcePool::new(self.window.capacity(), &mut *self.factory);

        info!(
            window_size = size,
            capacity = self.window.capacity(),
            evicted,
            "tile window resized"
        );
        Ok(())
    }

    /// Materialize every resident tile again, nearest first.
    ///
    /// Used after the source's palette changes. Returns the number of tiles
    /// repainted.
    pub fn repaint(&mut self) -> usize {
        let mut count = 0;
        for offset in SpiralOffsets::for_window(self.window.size()) {
            if let Some(occupant) = self.window.occupant_mut(offset) {
                let fill = self
                    .source
                    .materialize(occupant.tile, occupant.handle.resource_mut());
                if fill == FillOutcome::Blank {
                    self.stats.blank_fills += 1;
                }
                count += 1;
            }
        }
        self.stats.repaints += 1;
        debug!(tiles = count, "window repainted");
        count
    }

    fn load_next(&mut self) -> Option<LoadedTile> {
        let center = self.window.center_tile();
        let offset = SpiralOffsets::for_window(self.window.size()).find(|&offset| {
            let empty = self
                .window
                .get(offset)
                .is_some_and(|slot| !slot.is_occupied());
            empty && self.source.is_valid_tile(center.offset_by(offset))
        })?;
        let tile = center.offset_by(offset);

        let Some(mut handle) = self.pool.acquire() else {
            error!(
                tile = %tile,
                capacity = self.pool.capacity(),
                occupied = self.window.occupied_count(),
                "resource pool exhausted"
            );
            panic!(
                "resource pool exhausted with {} of {} slots occupied",
                self.window.occupied_count(),
                self.pool.capacity()
            );
        };

        let fill = self.source.materialize(tile, handle.resource_mut());
        let id = handle.id();
        if let Some(displaced) = self.window.put(offset, tile, handle) {
            self.evict(displaced);
        }

        self.stats.loads += 1;
        if fill == FillOutcome::Blank {
            self.stats.blank_fills += 1;
        }
        Some(LoadedTile {
            tile,
            offset,
            handle: id,
            fill,
        })
    }

    fn evict(&mut self, occupant: Occupant<R>) {
        self.source.release(occupant.tile);
        self.pool.release(occupant.handle);
        self.stats.evictions += 1;
    }
}

impl<R: TileResource, S> TilePager<R, S> {
    pub fn center(&self) -> TileCoord {
        self.window.center_tile()
    }

    pub fn window_size(&self) -> usize {
        self.window.size()
    }

    /// Total slots, equal to the pool's capacity.
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    pub fn occupied_count(&self) -> usize {
        self.window.occupied_count()
    }

    /// Resources currently in the pool.
    pub fn free_count(&self) -> usize {
        self.pool.free_count()
    }

    pub fn slot(&self, offset: WindowOffset) -> Option<&Slot<R>> {
        self.window.get(offset)
    }

    /// Resident occupants in row-major window order.
    pub fn resident(&self) -> impl Iterator<Item = (WindowOffset, &Occupant<R>)> + '_ {
        self.window.occupied()
    }

    pub fn resident_tiles(&self) -> Vec<TileCoord> {
        self.window.occupied().map(|(_, o)| o.tile).collect()
    }

    /// Handle currently holding `tile`, if resident.
    pub fn handle_of(&self, tile: TileCoord) -> Option<HandleId> {
        let offset = tile.offset_from(self.window.center_tile());
        self.window
            .get(offset)
            .and_then(Slot::occupant)
            .filter(|o| o.tile == tile)
            .map(|o| o.handle.id())
    }

    pub fn stats(&self) -> PagerStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<R: TileResource, S: RasterSource> TilePager<R, S> {
    /// Whether every valid tile inside the window is resident.
    pub fn is_complete(&self) -> bool {
        let center = self.window.center_tile();
        SpiralOffsets::for_window(self.window.size()).all(|offset| {
            self.window.get(offset).is_some_and(Slot::is_occupied)
                || !self.source.is_valid_tile(center.offset_by(offset))
        })
    }
}

impl<R: TileResource, S> std::fmt::Debug for TilePager<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TilePager")
            .field("center", &self.window.center_tile())
            .field("window_size", &self.window.size())
            .field("occupied", &self.window.occupied_count())
            .field("free", &self.pool.free_count())
            .field("stats", &self.stats)
            .finish()
    }
}
