//! Color raster plus depth buffer.
//!
//! The depth buffer stores normalized depth (0 at the near plane, 1 at the
//! far plane); smaller is closer. Every pixel starts at [`DEPTH_CLEAR`], above
//! the valid range, so the first in-range candidate always wins.

use crate::colors;
use crate::raster::{Raster, Rgb};

/// Initial depth of every pixel.
pub const DEPTH_CLEAR: f32 = 2.0;

/// Owns the output raster and its depth buffer for the duration of a render.
///
/// All triangles of all shapes write through [`FrameBuffer::try_write`], so
/// draw order decides ties: a later fragment at exactly equal depth never
/// overwrites an earlier one.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    color: Raster,
    depth: Vec<f32>,
}

impl FrameBuffer {
    /// Creates a cleared frame: background color, depth at [`DEPTH_CLEAR`].
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, colors::BACKGROUND)
    }

    pub fn with_background(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            color: Raster::new(width, height, background),
            depth: vec![DEPTH_CLEAR; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Resets color to `background` and depth to [`DEPTH_CLEAR`].
    pub fn clear(&mut self, background: Rgb) {
        self.color.fill(background);
        self.depth.fill(DEPTH_CLEAR);
    }

    /// Writes `color` at (x, y) if `0 < depth < stored depth`, recording the new depth.
    ///
    /// Returns whether the write happened. Out-of-bounds coordinates and NaN
    /// depths are rejected.
    #[inline]
    pub fn try_write(&mut self, x: i32, y: i32, depth: f32, color: Rgb) -> bool {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return false;
        }
        let idx = y as usize * self.width() as usize + x as usize;
        if depth > 0.0 && depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.color.set(x as u32, y as u32, color);
            true
        } else {
            false
        }
    }

    /// Stored depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        (x < self.width() && y < self.height())
            .then(|| self.depth[y as usize * self.width() as usize + x as usize])
    }

    /// Color at (x, y), or None if out of bounds.
    #[inline]
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgb> {
        self.color.get(x, y)
    }

    pub fn raster(&self) -> &Raster {
        &self.color
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth
    }

    /// Consumes the frame and hands back the finished image.
    pub fn into_raster(self) -> Raster {
        self.color
    }
}
