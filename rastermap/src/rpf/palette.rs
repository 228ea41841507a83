//! Color lookup tables (CLUTs).
//!
//! Decoded tiles hold palette indices, not colors. A [`Palette`] turns those
//! indices into RGB only when pixels are handed to a tile resource, so the
//! same decoded tile can be shown under a different palette (day, dusk,
//! night) without decoding it again.

use image::{Rgb, RgbImage};

use super::{DecodeError, IndexedTile, BACKGROUND_INDEX, MAX_PALETTE_COLORS};
use crate::coord::TILE_PIXELS;

/// An indexed color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Create a palette, rejecting tables that would overlap the background index.
    pub fn new(name: impl Into<String>, colors: Vec<[u8; 3]>) -> Result<Self, DecodeError> {
        let name = name.into();
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(DecodeError::PaletteTooLarge {
                name,
                len: colors.len(),
            });
        }
        Ok(Self { name, colors })
    }

    /// Build a palette known to fit within the color indices.
    pub(super) fn from_colors(name: &str, colors: Vec<[u8; 3]>) -> Self {
        debug_assert!(colors.len() <= MAX_PALETTE_COLORS);
        Self {
            name: name.to_string(),
            colors,
        }
    }

    /// Linear grayscale ramp covering every color index.
    pub fn grayscale() -> Self {
        let colors = (0..MAX_PALETTE_COLORS as u16)
            .map(|i| {
                let v = i as u8;
                [v, v, v]
            })
            .collect();
        Self::from_colors("grayscale", colors)
    }

    /// A copy of this palette with every color scaled by `factor` (0.0-1.0).
    ///
    /// Used to derive night tables from day tables.
    pub fn dimmed(&self, name: impl Into<String>, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            name: name.into(),
            colors: self
                .colors
                .iter()
                .map(|c| c.map(|v| (v as f32 * factor).round() as u8))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for `index`, or `None` for the background index and unmapped entries.
    #[inline]
    pub fn color(&self, index: u8) -> Option<[u8; 3]> {
        if index == BACKGROUND_INDEX {
            return None;
        }
        self.colors.get(index as usize).copied()
    }

    /// Resolve a decoded tile into a new RGB image.
    pub fn resolve(&self, tile: &IndexedTile, background: [u8; 3]) -> RgbImage {
        let mut image = RgbImage::new(TILE_PIXELS, TILE_PIXELS);
        self.resolve_into(tile, background, &mut image);
        image
    }

    /// Resolve a decoded tile into an existing 256×256 image.
    pub fn resolve_into(&self, tile: &IndexedTile, background: [u8; 3], out: &mut RgbImage) {
        debug_assert_eq!(out.dimensions(), (TILE_PIXELS, TILE_PIXELS));
        for (pixel, &index) in out.pixels_mut().zip(tile.indices()) {
            *pixel = Rgb(self.color(index).unwrap_or(background));
        }
    }
}
