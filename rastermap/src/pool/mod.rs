//! Fixed-capacity pool of tile resources.
//!
//! Resources are allocated once when the pool is built and then only ever
//! move between the pool and a window slot. A [`ResourceHandle`] owns its
//! resource and is neither `Clone` nor `Copy`, so a resource can never sit in
//! two places at once.
//!
//! # Example
//!
//! ```
//! use rastermap::pool::{PixelBuffer, ResourcePool};
//!
//! let mut pool = ResourcePool::new(9, PixelBuffer::new);
//! let handle = pool.acquire().expect("pool has capacity");
//! assert_eq!(pool.free_count(), 8);
//!
//! pool.release(handle);
//! assert_eq!(pool.free_count(), 9);
//! ```

mod resource;

pub use resource::{PixelBuffer, ResourceFactory, TileFormat, TileResource};

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

/// Stable identity of a pooled resource.
///
/// Two handles with the same id always wrap the same underlying resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId {
    pool: u32,
    index: u32,
}

impl HandleId {
    /// Index of the resource within its pool.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.pool, self.index)
    }
}

/// Exclusive ownership of one pooled resource.
#[derive(Debug)]
pub struct ResourceHandle<R> {
    id: HandleId,
    resource: R,
}

impl<R> ResourceHandle<R> {
    /// Identity of the wrapped resource.
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Borrow the resource.
    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Mutably borrow the resource.
    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

/// Free list of pre-allocated resources.
pub struct ResourcePool<R> {
    pool_id: u32,
    free: Vec<ResourceHandle<R>>,
    /// Per-index flag: `true` while the handle is outside the pool
    outstanding: Vec<bool>,
}

impl<R: TileResource> ResourcePool<R> {
    /// Build a pool holding `capacity` resources produced by `factory`.
    pub fn new(capacity: usize, mut factory: impl ResourceFactory<R>) -> Self {
        let pool_id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        let mut free = Vec::with_capacity(capacity);

        // Reverse so the first acquire hands out index 0.
        for index in (0..capacity).rev() {
            free.push(ResourceHandle {
                id: HandleId {
                    pool: pool_id,
                    index: index as u32,
                },
                resource: factory.create(),
            });
        }

        Self {
            pool_id,
            free,
            outstanding: vec![false; capacity],
        }
    }

    /// Take a resource out of the pool, or `None` when every resource is in use.
    pub fn acquire(&mut self) -> Option<ResourceHandle<R>> {
        let handle = self.free.pop()?;
        self.outstanding[handle.id.index()] = true;
        Some(handle)
    }

    /// Return a resource to the pool.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this pool or is not currently
    /// checked out. Both indicate a broken ownership invariant in the caller.
    pub fn release(&mut self, mut handle: ResourceHandle<R>) {
        let id = handle.id;
        assert!(
            id.pool == self.pool_id && self.outstanding.get(id.index()).copied() == Some(true),
            "resource {} released to pool #{} that does not own it",
            id,
            self.pool_id
        );

        handle.resource.reset();
        self.outstanding[id.index()] = false;
        self.free.push(handle);
    }
}

impl<R> ResourcePool<R> {
    /// Total number of resources owned by the pool (free or checked out).
    pub fn capacity(&self) -> usize {
        self.outstanding.len()
    }

    /// Number of resources currently available.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of resources currently checked out.
    pub fn outstanding_count(&self) -> usize {
        self.capacity() - self.free.len()
    }

    /// Whether every resource is back in the pool.
    pub fn is_full(&self) -> bool {
        self.free.len() == self.capacity()
    }
}

impl<R> fmt::Debug for ResourcePool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("pool_id", &self.pool_id)
            .field("capacity", &self.capacity())
            .field("free", &self.free_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_pool_is_full() {
        let pool = ResourcePool::new(4, PixelBuffer::new);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.free_count(), 4);
        assert_eq!(pool.outstanding_count(), 0);
        assert!(pool.is_full());
    }

    #[test]
    fn test_acquire_until_empty() {
        let mut pool = ResourcePool::new(3, PixelBuffer::new);
        let handles: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();

        assert!(pool.acquire().is_none());
        assert_eq!(pool.free_count(), 0);

        let ids: HashSet<_> = handles.iter().map(|h| h.id()).collect();
        assert_eq!(ids.len(), 3, "handles must be distinct");
    }

    #[test]
    fn test_first_acquire_is_index_zero() {
        let mut pool = ResourcePool::new(3, PixelBuffer::new);
        assert_eq!(pool.acquire().unwrap().id().index(), 0);
        assert_eq!(pool.acquire().unwrap().id().index(), 1);
    }

    #[test]
    fn test_release_resets_resource() {
        let mut pool = ResourcePool::new(1, PixelBuffer::new);
        let mut handle = pool.acquire().unwrap();
        let id = handle.id();

        let pixels = image::RgbImage::from_pixel(256, 256, image::Rgb([1, 2, 3]));
        handle.resource_mut().upload(&pixels, TileFormat::RGB_256);
        pool.release(handle);

        let handle = pool.acquire().unwrap();
        assert_eq!(handle.id(), id);
        assert_eq!(handle.resource().uploads(), 0);
        assert_eq!(handle.resource().image().get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "does not own it")]
    fn test_release_foreign_handle_panics() {
        let mut first = ResourcePool::new(1, PixelBuffer::new);
        let mut second = ResourcePool::new(1, PixelBuffer::new);

        let handle = first.acquire().unwrap();
        second.release(handle);
    }

    #[test]
    fn test_handle_id_display() {
        let mut pool = ResourcePool::new(2, PixelBuffer::new);
        let handle = pool.acquire().unwrap();
        assert!(handle.id().to_string().ends_with(".0"));
    }
}
