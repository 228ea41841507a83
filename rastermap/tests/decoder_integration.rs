//! Integration tests for frame decoding and palette resolution.
//!
//! Builds compressed frames by hand (packed 12-bit codes, a lookup table and
//! color tables) and checks the decoded tiles pixel by pixel.
//!
//! Run with: `cargo test --test decoder_integration`

use rastermap::rpf::{
    pack_block_codes, CompressedFrame, DecodeError, DecodeStatus, FrameDecoder, IndexBlock,
    MaskGrid, Palette, BACKGROUND_INDEX, LOOKUP_ENTRIES, SUBFRAME_BYTES,
};

// ============================================================================
// Helper Functions
// ============================================================================

const COLORS: usize = 250;

/// Lookup entry `k` holds `(k + i) % 250` at block pixel `i`.
fn lookup() -> Vec<IndexBlock> {
    (0..LOOKUP_ENTRIES)
        .map(|k| {
            let mut block = [0u8; 16];
            for (i, v) in block.iter_mut().enumerate() {
                *v = ((k + i) % COLORS) as u8;
            }
            block
        })
        .collect()
}

/// Block `n` uses code `(n + shift) % 4096`.
fn subframe(shift: usize) -> Vec<u8> {
    let codes: Vec<u16> = (0..LOOKUP_ENTRIES)
        .map(|n| ((n + shift) % LOOKUP_ENTRIES) as u16)
        .collect();
    pack_block_codes(&codes)
}

fn expected_index(shift: usize, x: u32, y: u32) -> u8 {
    let n = (y / 4) as usize * 64 + (x / 4) as usize;
    let code = (n + shift) % LOOKUP_ENTRIES;
    let i = (y % 4) as usize * 4 + (x % 4) as usize;
    ((code + i) % COLORS) as u8
}

fn palette(name: &str, tint: u8) -> Palette {
    let colors = (0..COLORS)
        .map(|i| [i as u8, tint, 255 - i as u8])
        .collect();
    Palette::new(name, colors).unwrap()
}

/// Frame whose subframe `(r, c)` is shifted by `r * 6 + c`.
fn frame(masked: MaskGrid, missing: Option<(usize, usize)>) -> CompressedFrame {
    let subframes = (0..36)
        .map(|i| {
            if missing == Some((i / 6, i % 6)) {
                None
            } else {
                Some(subframe(i))
            }
        })
        .collect();
    CompressedFrame::new(
        subframes,
        lookup(),
        masked,
        vec![palette("day", 10), palette("night", 200)],
    )
    .unwrap()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_packed_subframe_size() {
    assert_eq!(subframe(0).len(), SUBFRAME_BYTES);
}

#[test]
fn test_decode_every_subframe() {
    let frame = frame(MaskGrid::default(), None);
    let decoder = FrameDecoder::new();

    for row in 0..6u8 {
        for col in 0..6u8 {
            let (tile, status) = decoder.decode(&frame, row, col).unwrap();
            assert_eq!(status, DecodeStatus::Decoded);

            let shift = row as usize * 6 + col as usize;
            for (x, y) in [(0, 0), (3, 3), (4, 0), (255, 255), (17, 130), (128, 64)] {
                assert_eq!(
                    tile.get(y, x),
                    expected_index(shift, x, y),
                    "subframe ({}, {}) pixel ({}, {})",
                    row,
                    col,
                    x,
                    y
                );
            }
        }
    }
}

#[test]
fn test_parallel_and_sequential_agree() {
    let frame = frame(MaskGrid::default(), None);
    let (parallel, _) = FrameDecoder::new().decode(&frame, 2, 5).unwrap();
    let (sequential, _) = FrameDecoder::new()
        .with_parallel(false)
        .decode(&frame, 2, 5)
        .unwrap();
    assert_eq!(parallel.indices(), sequential.indices());
}

#[test]
fn test_masked_and_missing_subframes() {
    let mut masked = MaskGrid::default();
    masked[1][4] = true;
    let frame = frame(masked, Some((5, 0)));
    let decoder = FrameDecoder::new();

    let (tile, status) = decoder.decode(&frame, 1, 4).unwrap();
    assert_eq!(status, DecodeStatus::Masked);
    assert!(tile.is_blank());
    assert_eq!(tile.get(100, 100), BACKGROUND_INDEX);

    let err = decoder.decode(&frame, 5, 0).unwrap_err();
    assert_eq!(err, DecodeError::MissingSubframe { row: 5, col: 0 });

    let err = decoder.decode(&frame, 6, 0).unwrap_err();
    assert_eq!(err, DecodeError::SubframeOutOfRange { row: 6, col: 0 });
}

#[test]
fn test_frame_validation() {
    let short = CompressedFrame::new(
        (0..36).map(|_| Some(vec![0u8; 100])).collect(),
        lookup(),
        MaskGrid::default(),
        Vec::new(),
    );
    assert!(matches!(
        short,
        Err(DecodeError::SubframeLength { row: 0, col: 0, len: 100 })
    ));

    let few = CompressedFrame::new(vec![None; 35], lookup(), MaskGrid::default(), Vec::new());
    assert!(matches!(few, Err(DecodeError::SubframeCount(35))));

    let small_lookup = CompressedFrame::new(
        vec![None; 36],
        vec![[0u8; 16]; 10],
        MaskGrid::default(),
        Vec::new(),
    );
    assert!(matches!(small_lookup, Err(DecodeError::LookupTableSize(10))));
}

/// One decode, two palettes: the indices are resolved twice without
/// decoding again.
#[test]
fn test_palette_swap_on_decoded_tile() {
    let frame = frame(MaskGrid::default(), None);
    let (tile, _) = FrameDecoder::new().decode(&frame, 0, 0).unwrap();

    let day = frame.clut(0).unwrap().resolve(&tile, [0, 0, 0]);
    let night = frame.clut(1).unwrap().resolve(&tile, [0, 0, 0]);

    let index = expected_index(0, 9, 7);
    assert_eq!(day.get_pixel(9, 7).0, [index, 10, 255 - index]);
    assert_eq!(night.get_pixel(9, 7).0, [index, 200, 255 - index]);
    assert!(frame.clut(2).is_none());
}
