//! Core rendering engine.
//!
//! The [`Engine`] owns the frame (color + depth) and runs every shape through
//! the pipeline:
//!
//! ```text
//! positions ──project──▶ screen vertices ─┐
//!                                          ├─assemble/cull─▶ triangles ─box/scan─▶ rows ─shade─▶ frame
//! normals ───rotate───▶ camera normals ───┘
//! ```
//!
//! All shapes share one depth buffer, so shapes drawn later are correctly
//! occluded by closer geometry from earlier shapes (and vice versa).
//!
//! [`render`] is the one-call entry point: validate, draw everything, return
//! the finished [`Raster`].

use std::fmt;

use crate::camera::{Camera, CameraParams};
use crate::colors;
use crate::model::{Material, MeshShape, Model};
use crate::raster::Raster;
use crate::render::framebuffer::FrameBuffer;
use crate::render::rasterizer::{assemble_triangles, ScanlineRasterizer, ShadingMode};
use crate::transform;

/// Input that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Width or height is zero.
    InvalidDimensions { width: u32, height: u32 },
    /// A shape references a material that does not exist.
    MaterialOutOfRange {
        shape: usize,
        material: usize,
        count: usize,
    },
    /// A shape's index buffer points past its vertex list.
    IndexOutOfRange {
        shape: usize,
        index: u32,
        count: usize,
    },
    /// A shape's flat arrays are not whole triples, or positions and normals differ in length.
    MalformedShape { shape: usize },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidDimensions { width, height } => {
                write!(f, "invalid raster size {width}x{height}")
            }
            RenderError::MaterialOutOfRange {
                shape,
                material,
                count,
            } => write!(
                f,
                "shape {shape} uses material {material} but only {count} materials exist"
            ),
            RenderError::IndexOutOfRange {
                shape,
                index,
                count,
            } => write!(
                f,
                "shape {shape} references vertex {index} but has only {count} vertices"
            ),
            RenderError::MalformedShape { shape } => write!(
                f,
                "shape {shape} has mismatched or incomplete position/normal/index arrays"
            ),
        }
    }
}

impl std::error::Error for RenderError {}

/// Counters for one drawn shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeStats {
    /// Triangles in the index buffer.
    pub triangles: usize,
    /// Triangles left after depth culling.
    pub assembled: usize,
    /// Triangles with an on-screen bounding box.
    pub rasterized: usize,
    /// Scanline rows shaded.
    pub rows: usize,
}

/// Checks a shape's arrays and material reference before drawing.
pub fn validate_shape(
    index: usize,
    shape: &MeshShape,
    material_count: usize,
) -> Result<(), RenderError> {
    if shape.positions.len() % 3 != 0
        || shape.indices.len() % 3 != 0
        || shape.normals.len() != shape.positions.len()
    {
        return Err(RenderError::MalformedShape { shape: index });
    }

    let vertex_count = shape.vertex_count();
    if let Some(&bad) = shape.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(RenderError::IndexOutOfRange {
            shape: index,
            index: bad,
            count: vertex_count,
        });
    }

    match shape.material_id {
        Some(material) if material >= material_count => Err(RenderError::MaterialOutOfRange {
            shape: index,
            material,
            count: material_count,
        }),
        _ => Ok(()),
    }
}

pub struct Engine {
    frame: FrameBuffer,
    rasterizer: ScanlineRasterizer,
    camera: Camera,
}

impl Engine {
    pub fn new(
        width: u32,
        height: u32,
        camera: &CameraParams,
        mode: ShadingMode,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            frame: FrameBuffer::new(width, height),
            rasterizer: ScanlineRasterizer::new(mode),
            camera: Camera::new(camera),
        })
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.rasterizer.mode()
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        self.rasterizer = ScanlineRasterizer::new(mode);
    }

    pub fn set_camera(&mut self, params: &CameraParams) {
        self.camera = Camera::new(params);
    }

    /// Resets the frame to background color and cleared depth.
    pub fn clear(&mut self) {
        self.frame.clear(colors::BACKGROUND);
    }

    /// Draws one shape into the frame.
    ///
    /// `index` identifies the shape in errors; `materials` is the table its
    /// `material_id` points into.
    pub fn draw_shape(
        &mut self,
        index: usize,
        shape: &MeshShape,
        materials: &[Material],
    ) -> Result<ShapeStats, RenderError> {
        validate_shape(index, shape, materials.len())?;
        Ok(self.draw_validated(index, shape, materials))
    }

    fn draw_validated(
        &mut self,
        index: usize,
        shape: &MeshShape,
        materials: &[Material],
    ) -> ShapeStats {
        let diffuse = match shape.material_id {
            Some(m) => colors::from_diffuse(materials[m].diffuse),
            None => colors::from_diffuse(Material::default().diffuse),
        };
        let (width, height) = (self.width(), self.height());

        let vertices = transform::project_vertices(&shape.positions, &self.camera, width, height);
        let normals = transform::rotate_normals(&shape.normals, &self.camera);
        let triangles = assemble_triangles(&shape.indices, &vertices, &normals);
        let prepared = self.rasterizer.setup(&triangles, width, height);

        for triangle in &prepared {
            self.rasterizer.fill_triangle(triangle, &mut self.frame, diffuse);
        }

        let stats = ShapeStats {
            triangles: shape.triangle_count(),
            assembled: triangles.len(),
            rasterized: prepared.len(),
            rows: prepared.iter().map(|t| t.rows.len()).sum(),
        };
        log::debug!(
            "shape {index} {:?}: {} vertices, {} triangles, {} after depth cull, {} on screen, {} rows",
            shape.name,
            vertices.len(),
            stats.triangles,
            stats.assembled,
            stats.rasterized,
            stats.rows
        );
        stats
    }

    /// Draws every shape in order.
    ///
    /// Every shape is validated first; on error the frame is left untouched.
    pub fn draw_shapes(
        &mut self,
        shapes: &[MeshShape],
        materials: &[Material],
    ) -> Result<ShapeStats, RenderError> {
        for (index, shape) in shapes.iter().enumerate() {
            validate_shape(index, shape, materials.len())?;
        }

        let mut total = ShapeStats::default();
        for (index, shape) in shapes.iter().enumerate() {
            let stats = self.draw_validated(index, shape, materials);
            total.triangles += stats.triangles;
            total.assembled += stats.assembled;
            total.rasterized += stats.rasterized;
            total.rows += stats.rows;
        }
        Ok(total)
    }

    pub fn draw_model(&mut self, model: &Model) -> Result<ShapeStats, RenderError> {
        self.draw_shapes(model.shapes(), model.materials())
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Hands back the finished image.
    pub fn into_raster(self) -> Raster {
        self.frame.into_raster()
    }
}

/// Renders `shapes` with the given camera into a fresh `width` x `height` raster.
///
/// All shapes are validated before anything is drawn.
pub fn render(
    shapes: &[MeshShape],
    materials: &[Material],
    camera: &CameraParams,
    width: u32,
    height: u32,
    mode: ShadingMode,
) -> Result<Raster, RenderError> {
    let mut engine = Engine::new(width, height, camera, mode)?;
    let stats = engine.draw_shapes(shapes, materials)?;
    log::info!(
        "rendered {} shapes ({} of {} triangles on screen) at {width}x{height} in {mode} mode",
        shapes.len(),
        stats.rasterized,
        stats.triangles
    );
    Ok(engine.into_raster())
}

/// [`render`] for a loaded [`Model`].
pub fn render_model(
    model: &Model,
    camera: &CameraParams,
    width: u32,
    height: u32,
    mode: ShadingMode,
) -> Result<Raster, RenderError> {
    render(model.shapes(), model.materials(), camera, width, height, mode)
}
