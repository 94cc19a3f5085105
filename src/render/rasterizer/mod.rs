//! Triangle setup and scanline polygon fill.
//!
//! Per shape, triangles flow through these stages:
//!
//! 1. [`assemble_triangles`]: index buffer → [`Triangle`]s, dropping triangles
//!    entirely in front of the near plane or behind the far plane.
//! 2. [`BoundingBox::of`]: screen-space box clamped to the raster; off-screen
//!    triangles are dropped.
//! 3. [`scanline::scan_triangle`]: one left/right [`ScanRow`] per covered row.
//! 4. [`ScanlineRasterizer::fill_triangle`]: walks each row's span through the
//!    active [`shader`], depth-testing into the [`FrameBuffer`].
//!
//! Each surviving triangle is carried as a single [`RasterTriangle`] record
//! holding its own box and rows, so filtering never has to keep parallel
//! lists in step.

pub mod interpolate;
pub mod scanline;
pub mod shader;

pub use scanline::{Intersection, ScanRow};
pub use shader::{ParseShadingModeError, ShadingMode};

use super::framebuffer::FrameBuffer;
use crate::math::vec3::Vec3;
use crate::raster::Rgb;
use crate::transform::ScreenVertex;

/// A face ready for rasterization: three projected vertices and their camera-space normals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [ScreenVertex; 3],
    pub normals: [Vec3; 3],
}

impl Triangle {
    pub fn new(vertices: [ScreenVertex; 3], normals: [Vec3; 3]) -> Self {
        Self { vertices, normals }
    }

    /// Screen positions with depth in `z`.
    #[inline]
    pub fn positions(&self) -> [Vec3; 3] {
        self.vertices.map(|v| v.position)
    }

    /// True when all three depths are past the far plane or all are before the near plane.
    ///
    /// Triangles straddling either plane are kept uncut.
    pub fn is_depth_culled(&self) -> bool {
        let [a, b, c] = self.vertices.map(|v| v.depth());
        (a > 1.0 && b > 1.0 && c > 1.0) || (a < 0.0 && b < 0.0 && c < 0.0)
    }
}

/// Builds triangles from an index buffer, skipping those rejected by
/// [`Triangle::is_depth_culled`].
///
/// Every index must be in range for both `vertices` and `normals`; a trailing
/// partial triple is ignored.
pub fn assemble_triangles(
    indices: &[u32],
    vertices: &[ScreenVertex],
    normals: &[Vec3],
) -> Vec<Triangle> {
    indices
        .chunks_exact(3)
        .map(|idx| {
            let [a, b, c] = [idx[0], idx[1], idx[2]].map(|i| i as usize);
            Triangle::new(
                [vertices[a], vertices[b], vertices[c]],
                [normals[a], normals[b], normals[c]],
            )
        })
        .filter(|t| !t.is_depth_culled())
        .collect()
}

/// Axis-aligned screen rectangle: top-left corner plus size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BoundingBox {
    /// Box around `triangle`, with its min corner clamped at 0 and its max corner
    /// at `(width, height)`.
    ///
    /// Returns `None` when the box starts past the right/bottom edge or ends
    /// before the left/top edge.
    pub fn of(triangle: &Triangle, width: u32, height: u32) -> Option<Self> {
        let (w, h) = (width as f32, height as f32);
        let [p1, p2, p3] = triangle.positions();

        let min_x = p1.x.min(p2.x).min(p3.x).max(0.0);
        let min_y = p1.y.min(p2.y).min(p3.y).max(0.0);
        if min_x > w || min_y > h {
            return None;
        }

        let max_x = p1.x.max(p2.x).max(p3.x).min(w);
        let max_y = p1.y.max(p2.y).max(p3.y).min(h);
        if max_x < 0.0 || max_y < 0.0 {
            return None;
        }

        Some(Self {
            x: min_x,
            y: min_y,
            w: max_x - min_x,
            h: max_y - min_y,
        })
    }
}

/// A triangle that survived culling, with its box and scanline intersections.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterTriangle {
    pub triangle: Triangle,
    pub bounds: BoundingBox,
    pub rows: Vec<ScanRow>,
}

/// Scanline polygon fill with a selectable [`ShadingMode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanlineRasterizer {
    mode: ShadingMode,
}

impl ScanlineRasterizer {
    pub fn new(mode: ShadingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ShadingMode {
        self.mode
    }

    /// Boxes and scans every triangle, dropping the ones entirely off-screen.
    pub fn setup(&self, triangles: &[Triangle], width: u32, height: u32) -> Vec<RasterTriangle> {
        triangles
            .iter()
            .filter_map(|triangle| {
                let bounds = BoundingBox::of(triangle, width, height)?;
                let rows = scanline::scan_triangle(triangle, &bounds);
                Some(RasterTriangle {
                    triangle: *triangle,
                    bounds,
                    rows,
                })
            })
            .collect()
    }

    /// Shades every row of `raster_triangle` into `buffer`.
    ///
    /// `diffuse` is the material color used by [`ShadingMode::Default`].
    pub fn fill_triangle(
        &self,
        raster_triangle: &RasterTriangle,
        buffer: &mut FrameBuffer,
        diffuse: Rgb,
    ) {
        shader::fill_rows(
            self.mode,
            &raster_triangle.triangle,
            &raster_triangle.rows,
            buffer,
            diffuse,
        );
    }
}
