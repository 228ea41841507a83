//! RasterMap - windowed tile paging over compressed raster maps
//!
//! This library keeps a bounded window of decoded map tiles around a moving
//! reference point. Tiles are decoded on demand from compressed raster
//! product frames, one per update, nearest first.
//!
//! ```text
//!  lat/lon ──► MapNavigator ──► ZoneCatalog (zone for the current scale)
//!                   │
//!                   ▼ center tile
//!              TilePager ◄──► ResourcePool    (fixed set of tile resources)
//!                   │   ◄──► TileWindow      (odd N×N slots around center)
//!                   ▼
//!              RpfRasterSource ──► FrameDecoder ──► Palette ──► TileResource
//! ```
//!
//! # Modules
//!
//! - [`coord`]: tile, window and pixel coordinates; spiral traversal
//! - [`pool`]: resource pool and the tile resource capability
//! - [`window`]: the slot table around the center tile
//! - [`pager`]: evict / reuse / load orchestration
//! - [`zone`]: zones, catalogs and scale stepping
//! - [`rpf`]: compressed frames, decoding and palettes
//! - [`source`]: raster sources feeding the pager
//! - [`navigator`]: position and zoom front end
//! - [`config`]: INI configuration
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod coord;
pub mod logging;
pub mod navigator;
pub mod pager;
pub mod pool;
pub mod rpf;
pub mod source;
pub mod window;
pub mod zone;
