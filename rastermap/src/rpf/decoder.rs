//! Subframe decoder.
//!
//! Expands a subframe's packed block codes through the frame's lookup table
//! into a 256×256 tile of palette indices. Masked subframes are skipped and
//! left as background. Colors are not applied here; see [`super::Palette`].

use rayon::prelude::*;

use super::frame::{block_code, CODES_PER_SUBFRAME};
use super::{
    CompressedFrame, DecodeError, IndexedTile, BACKGROUND_INDEX, BLOCKS_PER_SIDE, BLOCK_PIXELS,
};
use crate::coord::{SUBFRAMES_PER_FRAME, TILE_PIXELS};

/// What a successful decode produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Block codes were expanded into the tile.
    Decoded,
    /// The subframe is masked; the tile was filled with background.
    Masked,
}

/// Decodes subframes of [`CompressedFrame`]s.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    parallel: bool,
}

impl FrameDecoder {
    /// Create a decoder that expands block rows in parallel.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enable or disable parallel expansion of block rows.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode one subframe into `out`, overwriting all of its pixels.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::SubframeOutOfRange`] for positions outside 6×6
    /// - [`DecodeError::MissingSubframe`] when the subframe has no data and
    ///   is not masked
    ///
    /// On error `out` is filled with background.
    pub fn decode_into(
        &self,
        frame: &CompressedFrame,
        row: u8,
        col: u8,
        out: &mut IndexedTile,
    ) -> Result<DecodeStatus, DecodeError> {
        let per = SUBFRAMES_PER_FRAME as u8;
        if row >= per || col >= per {
            out.fill(BACKGROUND_INDEX);
            return Err(DecodeError::SubframeOutOfRange { row, col });
        }

        if frame.is_masked(row, col) {
            out.fill(BACKGROUND_INDEX);
            return Ok(DecodeStatus::Masked);
        }

        let Some(data) = frame.subframe(row, col) else {
            out.fill(BACKGROUND_INDEX);
            return Err(DecodeError::MissingSubframe { row, col });
        };

        let lookup = frame.lookup();
        let band = (TILE_PIXELS * BLOCK_PIXELS) as usize;
        let expand = |(block_row, pixels): (usize, &mut [u8])| {
            expand_block_row(data, lookup, block_row, pixels);
        };

        if self.parallel {
            out.indices_mut()
                .par_chunks_mut(band)
                .enumerate()
                .for_each(expand);
        } else {
            out.indices_mut().chunks_mut(band).enumerate().for_each(expand);
        }

        Ok(DecodeStatus::Decoded)
    }

    /// Decode one subframe into a freshly allocated tile.
    pub fn decode(
        &self,
        frame: &CompressedFrame,
        row: u8,
        col: u8,
    ) -> Result<(IndexedTile, DecodeStatus), DecodeError> {
        let mut tile = IndexedTile::new();
        let status = self.decode_into(frame, row, col, &mut tile)?;
        Ok((tile, status))
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand one row of 64 blocks (4 pixel rows) into `pixels`.
fn expand_block_row(data: &[u8], lookup: &[[u8; 16]], block_row: usize, pixels: &mut [u8]) {
    let blocks = BLOCKS_PER_SIDE as usize;
    let edge = BLOCK_PIXELS as usize;
    let stride = TILE_PIXELS as usize;

    for block_col in 0..blocks {
        let n = block_row * blocks + block_col;
        debug_assert!(n < CODES_PER_SUBFRAME);
        let block = &lookup[block_code(data, n) as usize];

        for y in 0..edge {
            let start = y * stride + block_col * edge;
            pixels[start..start + edge].copy_from_slice(&block[y * edge..(y + 1) * edge]);
        }
    }
}
