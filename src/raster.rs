//! Output image: a width x height grid of RGB pixels, row-major.
//!
//! [`Raster`] is the hand-off type to anything downstream (filters, encoders).
//! Persistence goes through the `image` crate.

use std::path::Path;

/// One 8-bit-per-channel RGB pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Row-major RGB image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// Creates a raster filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the color at (x, y). Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Packed `r, g, b, r, g, b, ...` bytes, row-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| <[u8; 3]>::from(p)).collect()
    }

    /// Wraps packed RGB bytes. Returns `None` if the length is not `width * height * 3`.
    pub fn from_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 3 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[y as usize * self.width as usize + x as usize];
            image::Rgb([p.r, p.g, p.b])
        })
    }

    pub fn from_image(img: &image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| Rgb::from(p.0)).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Writes the raster to disk; the format follows the file extension (`.ppm`, `.png`, ...).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        self.to_image().save(path)
    }

    /// Reads any format the `image` crate understands into an RGB raster.
    pub fn open<P: AsRef<Path>>(path: P) -> image::ImageResult<Self> {
        Ok(Self::from_image(&image::open(path)?.to_rgb8()))
    }
}
