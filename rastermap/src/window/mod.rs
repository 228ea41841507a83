//! Square window of tile slots around a logical center tile.
//!
//! The window is addressed by [`WindowOffset`] relative to its center. Each
//! slot is either empty or holds an [`Occupant`]: the absolute tile it shows
//! together with the resource handle holding that tile's pixels. Because a
//! slot stores both or neither, "occupied" always implies a tile and a
//! handle.
//!
//! The window never allocates or frees resources itself. Anything it gives
//! back (from [`TileWindow::clear`], [`TileWindow::drain`] or a resize) must
//! be returned to the pool by the caller.

use thiserror::Error;

use crate::coord::{TileCoord, WindowOffset};
use crate::pool::ResourceHandle;

/// Errors from window construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Window edge length must be odd and non-zero.
    #[error("window size must be odd and greater than zero, got {0}")]
    InvalidSize(usize),
}

/// A tile resident in the window.
#[derive(Debug)]
pub struct Occupant<R> {
    /// Absolute tile coordinate shown by this slot
    pub tile: TileCoord,
    /// Resource holding the tile's pixels
    pub handle: ResourceHandle<R>,
}

/// Content of one window position.
#[derive(Debug)]
pub enum Slot<R> {
    Empty,
    Occupied(Occupant<R>),
}

impl<R> Slot<R> {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    /// The tile held by this slot, if any.
    pub fn tile(&self) -> Option<TileCoord> {
        match self {
            Slot::Occupied(occupant) => Some(occupant.tile),
            Slot::Empty => None,
        }
    }

    /// The occupant of this slot, if any.
    pub fn occupant(&self) -> Option<&Occupant<R>> {
        match self {
            Slot::Occupied(occupant) => Some(occupant),
            Slot::Empty => None,
        }
    }

    fn take(&mut self) -> Option<Occupant<R>> {
        std::mem::replace(self, Slot::Empty).into_occupant()
    }

    fn into_occupant(self) -> Option<Occupant<R>> {
        match self {
            Slot::Occupied(occupant) => Some(occupant),
            Slot::Empty => None,
        }
    }
}

/// Odd-sized square table of slots.
#[derive(Debug)]
pub struct TileWindow<R> {
    size: usize,
    center: TileCoord,
    slots: Vec<Slot<R>>,
}

impl<R> TileWindow<R> {
    /// Create an empty window with edge length `size`.
    pub fn new(size: usize) -> Result<Self, WindowError> {
        validate_size(size)?;
        Ok(Self {
            size,
            center: TileCoord::new(0, 0),
            slots: empty_slots(size),
        })
    }

    /// Re-initialize the window at a new size.
    ///
    /// All slots become empty. Previous occupants are handed back so the
    /// caller can return their resources to the pool. On error the window is
    /// left untouched.
    pub fn set_size(&mut self, size: usize) -> Result<Vec<Occupant<R>>, WindowError> {
        validate_size(size)?;
        let previous = self.drain();
        self.size = size;
        self.slots = empty_slots(size);
        Ok(previous)
    }

    /// Edge length of the window.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest absolute offset component addressable in this window.
    pub fn half_size(&self) -> i32 {
        (self.size as i32 - 1) / 2
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.size * self.size
    }

    /// The absolute tile the window is centered on.
    pub fn center_tile(&self) -> TileCoord {
        self.center
    }

    /// Move the logical center without touching any slot.
    pub fn set_center_tile(&mut self, center: TileCoord) {
        self.center = center;
    }

    /// Whether `offset` addresses a slot in this window.
    #[inline]
    pub fn is_in_bounds(&self, offset: WindowOffset) -> bool {
        let half = self.half_size();
        offset.row.abs() <= half && offset.col.abs() <= half
    }

    /// The slot at `offset`, or `None` when out of bounds.
    pub fn get(&self, offset: WindowOffset) -> Option<&Slot<R>> {
        self.index(offset).map(|i| &self.slots[i])
    }

    /// Mutable access to the occupant at `offset`.
    pub fn occupant_mut(&mut self, offset: WindowOffset) -> Option<&mut Occupant<R>> {
        let i = self.index(offset)?;
        match &mut self.slots[i] {
            Slot::Occupied(occupant) => Some(occupant),
            Slot::Empty => None,
        }
    }

    /// Place a tile and its resource at `offset`.
    ///
    /// Returns whatever occupied the slot before, which the caller must give
    /// back to the pool.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of bounds.
    #[must_use = "a displaced occupant owns a pooled resource"]
    pub fn put(
        &mut self,
        offset: WindowOffset,
        tile: TileCoord,
        handle: ResourceHandle<R>,
    ) -> Option<Occupant<R>> {
        let Some(i) = self.index(offset) else {
            panic!("offset {} outside window of size {}", offset, self.size);
        };
        let previous = std::mem::replace(&mut self.slots[i], Slot::Occupied(Occupant { tile, handle }));
        previous.into_occupant()
    }

    /// Empty the slot at `offset`, returning its occupant.
    #[must_use = "a cleared occupant owns a pooled resource"]
    pub fn clear(&mut self, offset: WindowOffset) -> Option<Occupant<R>> {
        let i = self.index(offset)?;
        self.slots[i].take()
    }

    /// Empty every slot, returning all occupants in row-major order.
    #[must_use = "drained occupants own pooled resources"]
    pub fn drain(&mut self) -> Vec<Occupant<R>> {
        self.slots.iter_mut().filter_map(Slot::take).collect()
    }

    /// Iterate over occupied slots with their offsets.
    pub fn occupied(&self) -> impl Iterator<Item = (WindowOffset, &Occupant<R>)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.occupant().map(|occupant| (self.offset_of(i), occupant))
        })
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    fn index(&self, offset: WindowOffset) -> Option<usize> {
        if !self.is_in_bounds(offset) {
            return None;
        }
        let half = self.half_size();
        let row = (offset.row + half) as usize;
        let col = (offset.col + half) as usize;
        Some(row * self.size + col)
    }

    fn offset_of(&self, index: usize) -> WindowOffset {
        let half = self.half_size();
        WindowOffset {
            row: (index / self.size) as i32 - half,
            col: (index % self.size) as i32 - half,
        }
    }
}

fn validate_size(size: usize) -> Result<(), WindowError> {
    if size == 0 || size % 2 == 0 {
        return Err(WindowError::InvalidSize(size));
    }
    Ok(())
}

fn empty_slots<R>(size: usize) -> Vec<Slot<R>> {
    std::iter::repeat_with(|| Slot::Empty)
        .take(size * size)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{PixelBuffer, ResourcePool};

    fn pool(capacity: usize) -> ResourcePool<PixelBuffer> {
        ResourcePool::new(capacity, PixelBuffer::new)
    }

    #[test]
    fn test_new_rejects_even_and_zero_sizes() {
        assert_eq!(
            TileWindow::<PixelBuffer>::new(0).unwrap_err(),
            WindowError::InvalidSize(0)
        );
        assert_eq!(
            TileWindow::<PixelBuffer>::new(4).unwrap_err(),
            WindowError::InvalidSize(4)
        );
        assert!(TileWindow::<PixelBuffer>::new(5).is_ok());
    }

    #[test]
    fn test_bounds_for_five_by_five() {
        let window = TileWindow::<PixelBuffer>::new(5).unwrap();
        assert_eq!(window.half_size(), 2);
        assert_eq!(window.capacity(), 25);
        assert!(window.is_in_bounds(WindowOffset::new(-2, 2)));
        assert!(!window.is_in_bounds(WindowOffset::new(3, 0)));
        assert!(!window.is_in_bounds(WindowOffset::new(0, -3)));
        assert!(window.get(WindowOffset::new(3, 0)).is_none());
    }

    #[test]
    fn test_put_get_clear() {
        let mut pool = pool(1);
        let mut window = TileWindow::new(3).unwrap();
        let handle = pool.acquire().unwrap();
        let id = handle.id();

        let displaced = window.put(WindowOffset::new(1, -1), TileCoord::new(5, 6), handle);
        assert!(displaced.is_none());
        assert_eq!(window.occupied_count(), 1);

        let slot = window.get(WindowOffset::new(1, -1)).unwrap();
        assert_eq!(slot.tile(), Some(TileCoord::new(5, 6)));
        assert_eq!(slot.occupant().unwrap().handle.id(), id);

        let cleared = window.clear(WindowOffset::new(1, -1)).unwrap();
        assert_eq!(cleared.tile, TileCoord::new(5, 6));
        assert_eq!(window.occupied_count(), 0);
        assert!(window.clear(WindowOffset::new(1, -1)).is_none());

        pool.release(cleared.handle);
        assert!(pool.is_full());
    }

    #[test]
    fn test_put_returns_displaced_occupant() {
        let mut pool = pool(2);
        let mut window = TileWindow::new(1).unwrap();

        let first = pool.acquire().unwrap();
        let first_id = first.id();
        assert!(window.put(WindowOffset::CENTER, TileCoord::new(0, 0), first).is_none());

        let second = pool.acquire().unwrap();
        let displaced = window
            .put(WindowOffset::CENTER, TileCoord::new(1, 1), second)
            .unwrap();
        assert_eq!(displaced.handle.id(), first_id);
        pool.release(displaced.handle);
    }

    #[test]
    #[should_panic(expected = "outside window")]
    fn test_put_out_of_bounds_panics() {
        let mut pool = pool(1);
        let mut window = TileWindow::new(3).unwrap();
        let handle = pool.acquire().unwrap();
        let _ = window.put(WindowOffset::new(2, 0), TileCoord::new(0, 0), handle);
    }

    #[test]
    fn test_set_center_leaves_slots_alone() {
        let mut pool = pool(1);
        let mut window = TileWindow::new(3).unwrap();
        let handle = pool.acquire().unwrap();
        let _ = window.put(WindowOffset::CENTER, TileCoord::new(7, 7), handle);

        window.set_center_tile(TileCoord::new(100, 100));
        assert_eq!(window.center_tile(), TileCoord::new(100, 100));
        assert_eq!(
            window.get(WindowOffset::CENTER).unwrap().tile(),
            Some(TileCoord::new(7, 7))
        );
    }

    #[test]
    fn test_set_size_returns_previous_occupants() {
        let mut pool = pool(3);
        let mut window = TileWindow::new(3).unwrap();
        for (i, offset) in [WindowOffset::new(-1, -1), WindowOffset::CENTER, WindowOffset::new(1, 1)]
            .into_iter()
            .enumerate()
        {
            let handle = pool.acquire().unwrap();
            let _ = window.put(offset, TileCoord::new(i as i32, 0), handle);
        }

        assert!(window.set_size(4).is_err());
        assert_eq!(window.occupied_count(), 3, "failed resize must not drop slots");

        let previous = window.set_size(5).unwrap();
        assert_eq!(previous.len(), 3);
        assert_eq!(window.size(), 5);
        assert_eq!(window.occupied_count(), 0);

        for occupant in previous {
            pool.release(occupant.handle);
        }
        assert!(pool.is_full());
    }

    #[test]
    fn test_occupied_reports_offsets() {
        let mut pool = pool(2);
        let mut window = TileWindow::new(3).unwrap();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let _ = window.put(WindowOffset::new(-1, 1), TileCoord::new(1, 2), a);
        let _ = window.put(WindowOffset::new(1, 0), TileCoord::new(3, 4), b);

        let occupied: Vec<_> = window.occupied().map(|(o, occ)| (o, occ.tile)).collect();
        assert_eq!(
            occupied,
            vec![
                (WindowOffset::new(-1, 1), TileCoord::new(1, 2)),
                (WindowOffset::new(1, 0), TileCoord::new(3, 4)),
            ]
        );

        for occupant in window.drain() {
            pool.release(occupant.handle);
        }
    }
}
