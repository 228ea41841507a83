//! Deterministic synthetic frames.
//!
//! Produces valid [`CompressedFrame`]s whose content depends only on the
//! frame position, so tests and demos can exercise the full decode path
//! without external map data.

use super::frame::CODES_PER_SUBFRAME;
use super::{pack_block_codes, CompressedFrame, IndexBlock, MaskGrid, Palette, LOOKUP_ENTRIES};
use crate::coord::SUBFRAMES_PER_FRAME;

/// Colors in the synthetic day palette.
const SYNTH_COLORS: usize = 32;

/// Generator for synthetic frames.
#[derive(Debug, Clone, Default)]
pub struct FrameSynth {
    masked: MaskGrid,
    missing: Vec<(u8, u8)>,
}

impl FrameSynth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a subframe as masked in every generated frame.
    pub fn with_masked(mut self, row: u8, col: u8) -> Self {
        if let Some(r) = self.masked.get_mut(row as usize) {
            if let Some(flag) = r.get_mut(col as usize) {
                *flag = true;
            }
        }
        self
    }

    /// Omit a subframe's data in every generated frame.
    pub fn with_missing(mut self, row: u8, col: u8) -> Self {
        self.missing.push((row, col));
        self
    }

    /// The day palette carried in slot 0 of every synthetic frame.
    pub fn day_palette() -> Palette {
        let colors = (0..SYNTH_COLORS)
            .map(|i| {
                let t = i as u8;
                [t.wrapping_mul(8), 128u8.wrapping_add(t.wrapping_mul(3)), 255 - t.wrapping_mul(6)]
            })
            .collect();
        Palette::from_colors("day", colors)
    }

    /// Generate the frame at (`frame_row`, `frame_col`).
    ///
    /// Palette slots: 0 = day, 1 = dusk, 2 = night.
    pub fn frame(&self, frame_row: u32, frame_col: u32) -> CompressedFrame {
        let per = SUBFRAMES_PER_FRAME as u8;
        let mut subframes = Vec::with_capacity((per * per) as usize);
        for row in 0..per {
            for col in 0..per {
                if self.missing.contains(&(row, col)) {
                    subframes.push(None);
                    continue;
                }
                let tile_row = frame_row * SUBFRAMES_PER_FRAME + row as u32;
                let tile_col = frame_col * SUBFRAMES_PER_FRAME + col as u32;
                subframes.push(Some(subframe_codes(tile_row, tile_col)));
            }
        }

        let day = Self::day_palette();
        let cluts = vec![day.dimmed("dusk", 0.7), day.dimmed("night", 0.3)];
        let mut all = vec![day];
        all.extend(cluts);

        // Sizes are fixed by construction, so validation cannot fail.
        match CompressedFrame::new(subframes, synth_lookup(), self.masked, all) {
            Ok(frame) => frame,
            Err(e) => unreachable!("synthetic frame is malformed: {}", e),
        }
    }
}

/// Lookup entry `k`: a flat block of color `k / 128` with a lighter
/// diagonal, giving every tile a visible texture.
fn synth_lookup() -> Vec<IndexBlock> {
    (0..LOOKUP_ENTRIES)
        .map(|k| {
            let base = ((k / 128) % SYNTH_COLORS) as u8;
            let mut block = [base; 16];
            for d in 0..4 {
                block[d * 4 + d] = (base + 1) % SYNTH_COLORS as u8;
            }
            block
        })
        .collect()
}

/// Block codes for one tile: 8×8-block checkers whose color depends on the
/// absolute tile position.
fn subframe_codes(tile_row: u32, tile_col: u32) -> Vec<u8> {
    let codes: Vec<u16> = (0..CODES_PER_SUBFRAME)
        .map(|n| {
            let block_row = (n / 64) as u32;
            let block_col = (n % 64) as u32;
            let checker = (block_row / 8 + block_col / 8) % 2;
            let color = (tile_row * 7 + tile_col * 3 + checker * 5) % SYNTH_COLORS as u32;
            (color * 128 + (n as u32 % 128)) as u16
        })
        .collect();
    pack_block_codes(&codes)
}
