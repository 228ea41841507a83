//! Fixed set of decoded-index buffers owned by the raster source.
//!
//! Buffers are keyed by the tile they hold so a tile that is materialized
//! again (for example after a palette swap) is resolved from its indices
//! without decoding. When every buffer is assigned, decoding falls back to
//! a single scratch buffer whose contents are not retained.

use std::collections::HashMap;

use crate::coord::TileCoord;
use crate::rpf::IndexedTile;

#[derive(Debug)]
pub(crate) struct DecodeBuffers {
    free: Vec<IndexedTile>,
    assigned: HashMap<TileCoord, IndexedTile>,
    scratch: IndexedTile,
    capacity: usize,
}

impl DecodeBuffers {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            free: (0..capacity).map(|_| IndexedTile::new()).collect(),
            assigned: HashMap::with_capacity(capacity),
            scratch: IndexedTile::new(),
            capacity,
        }
    }

    /// Decoded indices retained for `tile`.
    pub(crate) fn get(&self, tile: TileCoord) -> Option<&IndexedTile> {
        self.assigned.get(&tile)
    }

    /// A buffer to decode `tile` into.
    ///
    /// Returns the retained buffer when one is free, otherwise the scratch
    /// buffer (flagged `false`).
    pub(crate) fn checkout(&mut self, tile: TileCoord) -> (&mut IndexedTile, bool) {
        if !self.assigned.contains_key(&tile) {
            match self.free.pop() {
                Some(buffer) => {
                    self.assigned.insert(tile, buffer);
                }
                None => return (&mut self.scratch, false),
            }
        }
        match self.assigned.get_mut(&tile) {
            Some(buffer) => (buffer, true),
            None => (&mut self.scratch, false),
        }
    }

    /// Return the buffer held for `tile`, if any.
    pub(crate) fn release(&mut self, tile: TileCoord) -> bool {
        match self.assigned.remove(&tile) {
            Some(buffer) => {
                self.free.push(buffer);
                true
            }
            None => false,
        }
    }

    /// Return every assigned buffer.
    pub(crate) fn release_all(&mut self) {
        self.free.extend(self.assigned.drain().map(|(_, buffer)| buffer));
    }

    pub(crate) fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_assigns_until_exhausted() {
        let mut buffers = DecodeBuffers::new(2);

        let (_, retained) = buffers.checkout(TileCoord::new(0, 0));
        assert!(retained);
        let (_, retained) = buffers.checkout(TileCoord::new(0, 1));
        assert!(retained);
        let (_, retained) = buffers.checkout(TileCoord::new(0, 2));
        assert!(!retained, "third tile must use scratch");

        assert_eq!(buffers.assigned_count(), 2);
        assert_eq!(buffers.free_count(), 0);
        assert!(buffers.get(TileCoord::new(0, 2)).is_none());
    }

    #[test]
    fn test_checkout_same_tile_reuses_buffer() {
        let mut buffers = DecodeBuffers::new(2);
        buffers.checkout(TileCoord::new(1, 1)).0.fill(4);
        let (buffer, retained) = buffers.checkout(TileCoord::new(1, 1));
        assert!(retained);
        assert_eq!(buffer.get(0, 0), 4);
        assert_eq!(buffers.assigned_count(), 1);
    }

    #[test]
    fn test_release_returns_buffer() {
        let mut buffers = DecodeBuffers::new(1);
        buffers.checkout(TileCoord::new(3, 3));
        assert!(buffers.release(TileCoord::new(3, 3)));
        assert!(!buffers.release(TileCoord::new(3, 3)));
        assert_eq!(buffers.free_count(), 1);
        assert_eq!(buffers.capacity(), 1);
    }

    #[test]
    fn test_release_all() {
        let mut buffers = DecodeBuffers::new(3);
        buffers.checkout(TileCoord::new(0, 0));
        buffers.checkout(TileCoord::new(0, 1));
        buffers.release_all();
        assert_eq!(buffers.assigned_count(), 0);
        assert_eq!(buffers.free_count(), 3);
    }
}
