//! Compressed raster frames: model, decoder and color tables.
//!
//! # Pipeline
//!
//! ```text
//! CompressedFrame ──► FrameDecoder ──► IndexedTile ──► Palette ──► RgbImage
//!  (6×6 subframes,     (12-bit codes     (palette       (active      (256×256,
//!   lookup, masks)      → 4×4 blocks)     indices)       CLUT)        3 bytes/px)
//! ```
//!
//! Decoding and color resolution are separate steps so that a palette swap
//! never requires decoding again.

mod decoder;
mod error;
mod frame;
mod palette;
mod synth;

pub use decoder::{DecodeStatus, FrameDecoder};
pub use error::DecodeError;
pub use frame::{block_code, pack_block_codes, CompressedFrame, IndexBlock, IndexedTile, MaskGrid};
pub use palette::Palette;
pub use synth::FrameSynth;

/// Size of one packed subframe in bytes (4096 codes × 12 bits).
pub const SUBFRAME_BYTES: usize = 6144;

/// Number of entries in a frame's lookup table.
pub const LOOKUP_ENTRIES: usize = 4096;

/// Edge length of a lookup-table block in pixels.
pub const BLOCK_PIXELS: u32 = 4;

/// Blocks along each edge of a subframe.
pub const BLOCKS_PER_SIDE: u32 = 64;

/// Palette index reserved for background (masked, blank or missing pixels).
pub const BACKGROUND_INDEX: u8 = 255;

/// Maximum number of colors in a palette; index 255 is the background.
pub const MAX_PALETTE_COLORS: usize = 255;
