//! Tile resource capability and the default CPU-side pixel buffer.

use image::RgbImage;

use crate::coord::TILE_PIXELS;

/// Pixel layout handed to a [`TileResource`] on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFormat {
    pub width: u32,
    pub height: u32,
    /// Color components per pixel (always RGB)
    pub components: u8,
}

impl TileFormat {
    /// The only format produced by this crate: 256×256 RGB.
    pub const RGB_256: TileFormat = TileFormat {
        width: TILE_PIXELS,
        height: TILE_PIXELS,
        components: 3,
    };
}

/// A poolable destination for decoded tile pixels.
///
/// Implemented by the rendering side (a texture, a pixel buffer, ...). The
/// pager never inspects the resource; it only moves it between the pool and
/// the window and asks the raster source to fill it.
pub trait TileResource {
    /// Return the resource to a neutral state before it re-enters the pool.
    fn reset(&mut self);

    /// Accept decoded pixel data for one tile.
    fn upload(&mut self, pixels: &RgbImage, format: TileFormat);
}

/// Produces fresh resources when a pool is built.
pub trait ResourceFactory<R> {
    fn create(&mut self) -> R;
}

impl<R, F> ResourceFactory<R> for F
where
    F: FnMut() -> R,
{
    fn create(&mut self) -> R {
        self()
    }
}

/// CPU-resident tile resource backed by an [`RgbImage`].
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    image: RgbImage,
    uploads: u64,
}

impl PixelBuffer {
    /// Allocate a black 256×256 buffer.
    pub fn new() -> Self {
        Self {
            image: RgbImage::new(TILE_PIXELS, TILE_PIXELS),
            uploads: 0,
        }
    }

    /// The current pixel contents.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Number of uploads since the buffer was last reset.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TileResource for PixelBuffer {
    fn reset(&mut self) {
        self.image.fill(0);
        self.uploads = 0;
    }

    fn upload(&mut self, pixels: &RgbImage, format: TileFormat) {
        debug_assert_eq!(format, TileFormat::RGB_256);
        if pixels.dimensions() == self.image.dimensions() {
            self.image.copy_from_slice(pixels.as_raw());
        } else {
            self.image = pixels.clone();
        }
        self.uploads += 1;
    }
}
