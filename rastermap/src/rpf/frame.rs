//! Compressed frame model.
//!
//! A frame covers a 6×6 arrangement of subframes. Each subframe is a
//! 256×256 pixel tile stored as 64×64 block codes of 12 bits each, packed
//! two codes per three bytes:
//!
//! ```text
//! byte:   b0        b1        b2
//!       [cccc cccc][cccc dddd][dddd dddd]
//!        code 0 = b0 << 4 | b1 >> 4
//!        code 1 = (b1 & 0x0F) << 8 | b2
//! ```
//!
//! Codes index the frame's 4096-entry lookup table, whose entries are 4×4
//! blocks of palette indices in row-major order.

use super::{
    DecodeError, Palette, BACKGROUND_INDEX, BLOCKS_PER_SIDE, BLOCK_PIXELS, LOOKUP_ENTRIES,
    SUBFRAME_BYTES,
};
use crate::coord::{SUBFRAMES_PER_FRAME, TILE_PIXELS};

const SUBFRAMES: usize = (SUBFRAMES_PER_FRAME * SUBFRAMES_PER_FRAME) as usize;

/// One lookup-table entry: a 4×4 block of palette indices, row-major.
pub type IndexBlock = [u8; (BLOCK_PIXELS * BLOCK_PIXELS) as usize];

/// Per-subframe masking flags in `[row][col]` order.
pub type MaskGrid = [[bool; SUBFRAMES_PER_FRAME as usize]; SUBFRAMES_PER_FRAME as usize];

/// A 256×256 tile of palette indices.
#[derive(Clone, PartialEq, Eq)]
pub struct IndexedTile {
    indices: Box<[u8]>,
}

impl IndexedTile {
    /// A tile filled with the background index.
    pub fn new() -> Self {
        Self {
            indices: vec![BACKGROUND_INDEX; (TILE_PIXELS * TILE_PIXELS) as usize].into_boxed_slice(),
        }
    }

    /// Row-major palette indices.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub(crate) fn indices_mut(&mut self) -> &mut [u8] {
        &mut self.indices
    }

    /// Index at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> u8 {
        self.indices[(row * TILE_PIXELS + col) as usize]
    }

    #[inline]
    pub fn set(&mut self, row: u32, col: u32, index: u8) {
        self.indices[(row * TILE_PIXELS + col) as usize] = index;
    }

    pub fn fill(&mut self, index: u8) {
        self.indices.fill(index);
    }

    /// Whether every pixel is the background index.
    pub fn is_blank(&self) -> bool {
        self.indices.iter().all(|&i| i == BACKGROUND_INDEX)
    }
}

impl Default for IndexedTile {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IndexedTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedTile")
            .field("pixels", &self.indices.len())
            .finish()
    }
}

/// Read the `n`-th 12-bit block code from a packed subframe.
#[inline]
pub fn block_code(data: &[u8], n: usize) -> u16 {
    let base = (n / 2) * 3;
    if n % 2 == 0 {
        ((data[base] as u16) << 4) | ((data[base + 1] as u16) >> 4)
    } else {
        (((data[base + 1] & 0x0F) as u16) << 8) | data[base + 2] as u16
    }
}

/// Pack 12-bit block codes two per three bytes.
///
/// Codes above `0x0FFF` are truncated to their low 12 bits. An odd trailing
/// code is padded with a zero code.
pub fn pack_block_codes(codes: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(codes.len().div_ceil(2) * 3);
    for pair in codes.chunks(2) {
        let c0 = pair[0] & 0x0FFF;
        let c1 = pair.get(1).copied().unwrap_or(0) & 0x0FFF;
        out.push((c0 >> 4) as u8);
        out.push((((c0 & 0x0F) << 4) | (c1 >> 8)) as u8);
        out.push((c1 & 0xFF) as u8);
    }
    out
}

/// A compressed frame: 36 subframes, one lookup table, masking flags and
/// the color tables that may be used to display it.
#[derive(Debug, Clone)]
pub struct CompressedFrame {
    subframes: Vec<Option<Box<[u8]>>>,
    lookup: Box<[IndexBlock]>,
    masked: MaskGrid,
    cluts: Vec<Palette>,
}

impl CompressedFrame {
    /// Build a frame, validating every component's size.
    ///
    /// # Arguments
    ///
    /// * `subframes` - 36 entries in row-major order; `None` for subframes
    ///   without data
    /// * `lookup` - 4096 lookup-table blocks
    /// * `masked` - subframes to skip during decoding
    /// * `cluts` - color tables, indexed by palette slot
    pub fn new(
        subframes: Vec<Option<Vec<u8>>>,
        lookup: Vec<IndexBlock>,
        masked: MaskGrid,
        cluts: Vec<Palette>,
    ) -> Result<Self, DecodeError> {
        if subframes.len() != SUBFRAMES {
            return Err(DecodeError::SubframeCount(subframes.len()));
        }
        if lookup.len() != LOOKUP_ENTRIES {
            return Err(DecodeError::LookupTableSize(lookup.len()));
        }

        let per = SUBFRAMES_PER_FRAME as usize;
        let subframes = subframes
            .into_iter()
            .enumerate()
            .map(|(i, data)| match data {
                Some(bytes) if bytes.len() != SUBFRAME_BYTES => Err(DecodeError::SubframeLength {
                    row: (i / per) as u8,
                    col: (i % per) as u8,
                    len: bytes.len(),
                }),
                other => Ok(other.map(Vec::into_boxed_slice)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            subframes,
            lookup: lookup.into_boxed_slice(),
            masked,
            cluts,
        })
    }

    /// Packed block codes for a subframe, if present.
    pub fn subframe(&self, row: u8, col: u8) -> Option<&[u8]> {
        let i = subframe_index(row, col)?;
        self.subframes[i].as_deref()
    }

    /// Whether the subframe is masked (left as background when decoded).
    pub fn is_masked(&self, row: u8, col: u8) -> bool {
        subframe_index(row, col).is_some() && self.masked[row as usize][col as usize]
    }

    /// The lookup table.
    pub fn lookup(&self) -> &[IndexBlock] {
        &self.lookup
    }

    /// Color table for a palette slot.
    pub fn clut(&self, slot: usize) -> Option<&Palette> {
        self.cluts.get(slot)
    }

    /// Number of color tables carried by the frame.
    pub fn clut_count(&self) -> usize {
        self.cluts.len()
    }
}

pub(crate) fn subframe_index(row: u8, col: u8) -> Option<usize> {
    let per = SUBFRAMES_PER_FRAME as u8;
    (row < per && col < per).then(|| row as usize * per as usize + col as usize)
}

/// Number of block codes in a subframe.
pub(crate) const CODES_PER_SUBFRAME: usize = (BLOCKS_PER_SIDE * BLOCKS_PER_SIDE) as usize;
