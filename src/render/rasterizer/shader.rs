//! Span shaders: per-pixel depth and color for each shading mode.
//!
//! The scanline stage hands every row's [`ScanRow`] to [`fill_rows`], which
//! walks the pixels between the row's left and right crossings. What happens
//! per pixel is delegated to a [`SpanShader`]:
//!
//! 1. [`SpanShader::begin_span`] runs once per row and turns the two edge
//!    crossings into span endpoints (interpolating along the crossed edges).
//! 2. [`SpanShader::shade`] runs per pixel and yields a [`Fragment`], which is
//!    then depth-tested into the [`FrameBuffer`].
//!
//! | Mode | Depth | Color |
//! |------|-------|-------|
//! | `Default` | linear along span | material diffuse |
//! | `White` | linear along span | white |
//! | `Flat` | linear along span | first corner's normal |
//! | `Gouraud` | linear, edge then span | interpolated normal |
//! | `GouraudZ` | perspective, edge then span | interpolated normal |
//! | `Barycentric` | barycentric | interpolated normal |
//! | `BarycentricZ` | perspective barycentric | interpolated normal |

use std::fmt;
use std::str::FromStr;

use super::interpolate::{self, Sample};
use super::scanline::{Intersection, ScanRow};
use super::Triangle;
use crate::colors;
use crate::math::vec3::Vec3;
use crate::raster::Rgb;
use crate::render::framebuffer::FrameBuffer;

/// How triangles are colored and how depth is interpolated across them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShadingMode {
    /// Material diffuse color.
    #[default]
    Default,
    White,
    /// One color per triangle from its first vertex normal.
    Flat,
    /// Normals interpolated along edges, then along the span.
    Gouraud,
    /// Gouraud with perspective-corrected interpolation.
    GouraudZ,
    /// Normals interpolated with barycentric weights.
    Barycentric,
    /// Barycentric with perspective-corrected interpolation.
    BarycentricZ,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 7] = [
        ShadingMode::Default,
        ShadingMode::White,
        ShadingMode::Flat,
        ShadingMode::Gouraud,
        ShadingMode::GouraudZ,
        ShadingMode::Barycentric,
        ShadingMode::BarycentricZ,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShadingMode::Default => "default",
            ShadingMode::White => "white",
            ShadingMode::Flat => "flat",
            ShadingMode::Gouraud => "gouraud",
            ShadingMode::GouraudZ => "gouraud_z",
            ShadingMode::Barycentric => "barycentric",
            ShadingMode::BarycentricZ => "barycentric_z",
        }
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized shading mode name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseShadingModeError(pub String);

impl fmt::Display for ParseShadingModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = ShadingMode::ALL.iter().map(ShadingMode::name).collect();
        write!(
            f,
            "unknown shading mode {:?} (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for ParseShadingModeError {}

impl FromStr for ShadingMode {
    type Err = ParseShadingModeError;

    /// Accepts the canonical names plus the `--norm_*` style option spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().trim_start_matches('-').to_ascii_lowercase();
        match lowered.strip_prefix("norm_").unwrap_or(lowered.as_str()) {
            "default" => Ok(ShadingMode::Default),
            "white" => Ok(ShadingMode::White),
            "flat" => Ok(ShadingMode::Flat),
            "gouraud" => Ok(ShadingMode::Gouraud),
            "gouraud_z" => Ok(ShadingMode::GouraudZ),
            "barycentric" | "bary" => Ok(ShadingMode::Barycentric),
            "barycentric_z" | "bary_z" => Ok(ShadingMode::BarycentricZ),
            _ => Err(ParseShadingModeError(s.to_string())),
        }
    }
}

/// A shaded pixel candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub depth: f32,
    pub color: Rgb,
}

/// Per-pixel shading strategy.
pub trait SpanShader {
    /// Per-row state computed from the span's two crossings.
    type Span;

    fn begin_span(&self, triangle: &Triangle, row: &ScanRow) -> Self::Span;

    /// Depth and color of pixel `(x, y)` inside `span`.
    fn shade(&self, triangle: &Triangle, span: &Self::Span, x: f32, y: f32) -> Fragment;
}

/// Span ends with their depths, x snapped to the pixel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthSpan {
    pub start: Vec3,
    pub stop: Vec3,
}

/// Span ends with depths and normals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalSpan {
    pub start: Vec3,
    pub stop: Vec3,
    pub start_normal: Vec3,
    pub stop_normal: Vec3,
}

/// The crossed edge's endpoint positions and normals, in edge order.
#[inline]
fn edge_attributes(triangle: &Triangle, crossing: &Intersection) -> (Vec3, Vec3, Vec3, Vec3) {
    let [a, b] = crossing.edge;
    (
        triangle.vertices[a].position,
        triangle.normals[a],
        triangle.vertices[b].position,
        triangle.normals[b],
    )
}

/// Constant color; depth interpolated linearly along edges and span.
///
/// Serves `Default`, `White` and `Flat`, which differ only in the color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantShader {
    color: Rgb,
}

impl ConstantShader {
    pub fn new(color: Rgb) -> Self {
        Self { color }
    }
}

impl SpanShader for ConstantShader {
    type Span = DepthSpan;

    fn begin_span(&self, triangle: &Triangle, row: &ScanRow) -> DepthSpan {
        let depth_at = |crossing: &Intersection| {
            let (p1, _, p2, _) = edge_attributes(triangle, crossing);
            let depth = interpolate::lerp_depth(p1, p2, crossing.x, crossing.y);
            Vec3::new(crossing.x.round(), crossing.y, depth)
        };
        DepthSpan {
            start: depth_at(&row.left),
            stop: depth_at(&row.right),
        }
    }

    #[inline]
    fn shade(&self, _triangle: &Triangle, span: &DepthSpan, x: f32, y: f32) -> Fragment {
        Fragment {
            depth: interpolate::lerp_depth(span.start, span.stop, x, y),
            color: self.color,
        }
    }
}

/// Normal interpolated along the crossed edges, then across the span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GouraudShader {
    perspective: bool,
}

impl GouraudShader {
    pub fn new(perspective: bool) -> Self {
        Self { perspective }
    }

    #[inline]
    fn sample(&self, p1: Vec3, n1: Vec3, p2: Vec3, n2: Vec3, x: f32, y: f32) -> Sample {
        if self.perspective {
            interpolate::perspective_sample(p1, n1, p2, n2, x, y)
        } else {
            interpolate::lerp_sample(p1, n1, p2, n2, x, y)
        }
    }
}

impl SpanShader for GouraudShader {
    type Span = NormalSpan;

    fn begin_span(&self, triangle: &Triangle, row: &ScanRow) -> NormalSpan {
        let end = |crossing: &Intersection| {
            let (p1, n1, p2, n2) = edge_attributes(triangle, crossing);
            let s = self.sample(p1, n1, p2, n2, crossing.x, crossing.y);
            (Vec3::new(crossing.x.round(), crossing.y, s.depth), s.normal)
        };
        let (start, start_normal) = end(&row.left);
        let (stop, stop_normal) = end(&row.right);
        NormalSpan {
            start,
            stop,
            start_normal,
            stop_normal,
        }
    }

    #[inline]
    fn shade(&self, _triangle: &Triangle, span: &NormalSpan, x: f32, y: f32) -> Fragment {
        let s = self.sample(
            span.start,
            span.start_normal,
            span.stop,
            span.stop_normal,
            x,
            y,
        );
        Fragment {
            depth: s.depth,
            color: colors::from_normal(s.normal),
        }
    }
}

/// Depth and normal from barycentric weights over the whole triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarycentricShader {
    perspective: bool,
}

impl BarycentricShader {
    pub fn new(perspective: bool) -> Self {
        Self { perspective }
    }
}

impl SpanShader for BarycentricShader {
    type Span = ();

    fn begin_span(&self, _triangle: &Triangle, _row: &ScanRow) {}

    #[inline]
    fn shade(&self, triangle: &Triangle, _span: &(), x: f32, y: f32) -> Fragment {
        let corners = triangle.positions();
        let s = if self.perspective {
            interpolate::barycentric_perspective_sample(&corners, &triangle.normals, x, y)
        } else {
            interpolate::barycentric_sample(&corners, &triangle.normals, x, y)
        };
        Fragment {
            depth: s.depth,
            color: colors::from_normal(s.normal),
        }
    }
}

/// Inclusive pixel columns covered by `row`, clipped to `[0, width)`.
///
/// `None` when the span lies entirely off one side.
#[inline]
pub fn span_columns(row: &ScanRow, width: u32) -> Option<(i32, i32)> {
    let start = row.left.x.round();
    let stop = row.right.x.round();
    if start >= width as f32 || stop < 0.0 {
        return None;
    }
    Some(((start as i32).max(0), (stop as i32).min(width as i32 - 1)))
}

/// Shades `rows` of `triangle` into `buffer` with an explicit shader.
///
/// Rows outside the raster and spans entirely off-screen are skipped.
pub fn fill_rows_with_shader<S: SpanShader>(
    triangle: &Triangle,
    rows: &[ScanRow],
    buffer: &mut FrameBuffer,
    shader: &S,
) {
    for row in rows {
        let y = row.y();
        if y < 0.0 || y >= buffer.height() as f32 {
            log::trace!("skipping row {y} outside raster");
            continue;
        }
        let Some((start, stop)) = span_columns(row, buffer.width()) else {
            log::trace!("skipping off-screen span at row {y}");
            continue;
        };

        let span = shader.begin_span(triangle, row);
        for x in start..=stop {
            let fragment = shader.shade(triangle, &span, x as f32, y);
            buffer.try_write(x, y as i32, fragment.depth, fragment.color);
        }
    }
}

/// Shades `rows` of `triangle` into `buffer` using the shader for `mode`.
///
/// `diffuse` is only used by [`ShadingMode::Default`].
pub fn fill_rows(
    mode: ShadingMode,
    triangle: &Triangle,
    rows: &[ScanRow],
    buffer: &mut FrameBuffer,
    diffuse: Rgb,
) {
    match mode {
        ShadingMode::Default => {
            fill_rows_with_shader(triangle, rows, buffer, &ConstantShader::new(diffuse))
        }
        ShadingMode::White => {
            fill_rows_with_shader(triangle, rows, buffer, &ConstantShader::new(colors::WHITE))
        }
        ShadingMode::Flat => {
            let color = colors::from_normal(triangle.normals[0]);
            fill_rows_with_shader(triangle, rows, buffer, &ConstantShader::new(color))
        }
        ShadingMode::Gouraud => {
            fill_rows_with_shader(triangle, rows, buffer, &GouraudShader::new(false))
        }
        ShadingMode::GouraudZ => {
            fill_rows_with_shader(triangle, rows, buffer, &GouraudShader::new(true))
        }
        ShadingMode::Barycentric => {
            fill_rows_with_shader(triangle, rows, buffer, &BarycentricShader::new(false))
        }
        ShadingMode::BarycentricZ => {
            fill_rows_with_shader(triangle, rows, buffer, &BarycentricShader::new(true))
        }
    }
}
