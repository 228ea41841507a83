//! Error types for compressed frame handling.

use thiserror::Error;

/// Errors raised while building or decoding a compressed frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A frame must contain exactly 36 subframe entries.
    #[error("frame has {0} subframe entries, expected 36")]
    SubframeCount(usize),

    /// A subframe's compressed payload has the wrong size.
    #[error("subframe ({row}, {col}) is {len} bytes, expected 6144")]
    SubframeLength { row: u8, col: u8, len: usize },

    /// The lookup table does not have 4096 entries.
    #[error("lookup table has {0} entries, expected 4096")]
    LookupTableSize(usize),

    /// A color table exceeds the indices available for colors.
    #[error("palette '{name}' has {len} colors, at most 255 are allowed")]
    PaletteTooLarge { name: String, len: usize },

    /// Subframe position outside the 6×6 arrangement.
    #[error("subframe ({row}, {col}) is outside the 6×6 frame")]
    SubframeOutOfRange { row: u8, col: u8 },

    /// The subframe is neither present nor masked.
    #[error("subframe ({row}, {col}) has no compressed data")]
    MissingSubframe { row: u8, col: u8 },

    /// No frame is stored for the requested position.
    #[error("no frame stored at ({frame_row}, {frame_col}) in zone '{zone}'")]
    FrameNotFound {
        zone: String,
        frame_row: u32,
        frame_col: u32,
    },
}
