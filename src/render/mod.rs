//! Rendering backend: the frame buffer and the scanline rasterizer.

pub mod framebuffer;
pub mod rasterizer;

pub use framebuffer::{FrameBuffer, DEPTH_CLEAR};
pub use rasterizer::{
    assemble_triangles, BoundingBox, RasterTriangle, ScanRow, ScanlineRasterizer, ShadingMode,
    Triangle,
};
