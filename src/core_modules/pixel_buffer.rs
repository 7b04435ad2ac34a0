use crate::core_modules::pixel::Pixel;
use image::RgbImage;

/// An in-memory RGB raster with random access by (x, y) coordinate.
/// Rows are stored top to bottom, pixels left to right within a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// The width of the buffer in pixels.
    width: u32,
    /// The height of the buffer in pixels.
    height: u32,
    /// A flattened vector containing all the `Pixel` data, row-major.
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Creates a buffer of the given dimensions filled with black pixels.
    /// Zero-area buffers are valid and hold no pixels.
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = vec![Pixel::default(); width as usize * height as usize];

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );

        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Pixel {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        let index = self.index(x, y);
        self.pixels[index] = pixel;
    }

    /// Copies every pixel of `region` into this buffer, placing its top-left
    /// corner at (dest_x, dest_y). The region must fit within the buffer.
    pub fn blit(&mut self, region: &PixelBuffer, dest_x: u32, dest_y: u32) {
        for y in 0..region.height {
            for x in 0..region.width {
                self.set(dest_x + x, dest_y + y, region.get(x, y));
            }
        }
    }

    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let pixels = image.pixels().map(|rgb| Pixel::from(*rgb)).collect();

        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| self.get(x, y).into())
    }
}
