//! Center-outward traversal of window offsets.

use super::WindowOffset;

/// Iterator over every offset of a window, nearest rings first.
///
/// Ring 0 is the center. Each ring `r > 0` is walked clockwise starting at
/// its north-west corner: the top row west→east, the east column
/// north→south, the bottom row east→west, then the west column south→north.
/// The sequence is fully deterministic for a given half-width.
#[derive(Debug, Clone)]
pub struct SpiralOffsets {
    half: i32,
    ring: i32,
    step: i32,
}

impl SpiralOffsets {
    /// Offsets for a window whose offsets span `[-half, half]` on each axis.
    pub fn new(half: u32) -> Self {
        Self {
            half: half as i32,
            ring: 0,
            step: 0,
        }
    }

    /// Offsets for a window of odd edge length `size`.
    pub fn for_window(size: usize) -> Self {
        Self::new((size.saturating_sub(1) / 2) as u32)
    }
}

impl Iterator for SpiralOffsets {
    type Item = WindowOffset;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ring > self.half {
            return None;
        }

        if self.ring == 0 {
            self.ring = 1;
            self.step = 0;
            return Some(WindowOffset::CENTER);
        }

        let r = self.ring;
        let side = 2 * r;
        let s = self.step;
        let offset = if s < side {
            WindowOffset::new(-r, -r + s)
        } else if s < 2 * side {
            WindowOffset::new(-r + (s - side), r)
        } else if s < 3 * side {
            WindowOffset::new(r, r - (s - 2 * side))
        } else {
            WindowOffset::new(r - (s - 3 * side), -r)
        };

        self.step += 1;
        if self.step == 4 * side {
            self.ring += 1;
            self.step = 0;
        }

        Some(offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.ring > self.half {
            return (0, Some(0));
        }
        let edge = (2 * self.half + 1) as usize;
        let consumed = if self.ring == 0 {
            0
        } else {
            let inner = (2 * (self.ring - 1) + 1) as usize;
            inner * inner + self.step as usize
        };
        let remaining = edge * edge - consumed;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SpiralOffsets {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_single_slot_window() {
        let offsets: Vec<_> = SpiralOffsets::for_window(1).collect();
        assert_eq!(offsets, vec![WindowOffset::CENTER]);
    }

    #[test]
    fn test_three_by_three_order() {
        let offsets: Vec<_> = SpiralOffsets::for_window(3).collect();
        let expected = vec![
            WindowOffset::new(0, 0),
            WindowOffset::new(-1, -1),
            WindowOffset::new(-1, 0),
            WindowOffset::new(-1, 1),
            WindowOffset::new(0, 1),
            WindowOffset::new(1, 1),
            WindowOffset::new(1, 0),
            WindowOffset::new(1, -1),
            WindowOffset::new(0, -1),
        ];
        assert_eq!(offsets, expected);
    }

    #[test]
    fn test_covers_every_offset_once() {
        for size in [1usize, 3, 5, 7, 9] {
            let offsets: Vec<_> = SpiralOffsets::for_window(size).collect();
            assert_eq!(offsets.len(), size * size);

            let unique: HashSet<_> = offsets.iter().copied().collect();
            assert_eq!(unique.len(), size * size, "duplicates for size {}", size);

            let half = (size as i32 - 1) / 2;
            assert!(offsets
                .iter()
                .all(|o| o.row.abs() <= half && o.col.abs() <= half));
        }
    }

    #[test]
    fn test_rings_never_decrease() {
        let rings: Vec<_> = SpiralOffsets::for_window(7).map(|o| o.ring()).collect();
        assert!(rings.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(rings[0], 0);
        assert_eq!(*rings.last().unwrap(), 3);
    }

    #[test]
    fn test_size_hint_tracks_remaining() {
        let mut iter = SpiralOffsets::for_window(5);
        assert_eq!(iter.len(), 25);
        iter.next();
        assert_eq!(iter.len(), 24);
        for _ in 0..8 {
            iter.next();
        }
        assert_eq!(iter.len(), 16);
        let rest: Vec<_> = iter.collect();
        assert_eq!(rest.len(), 16);
    }
}
