//! A CPU scanline rasterizer for triangle meshes.
//!
//! Meshes are projected through a pinhole camera (frustum plus look-at),
//! filled row by row and depth-tested into an RGB raster. Seven shading modes
//! color the result, from flat material color to perspective-corrected
//! normal interpolation.
//!
//! # Quick Start
//!
//! ```ignore
//! use softraster::prelude::*;
//!
//! let model = Model::from_obj("teapot.obj")?;
//! let camera = CameraParams::from_file("camera.txt")?;
//! let image = render_model(&model, &camera, 640, 480, ShadingMode::GouraudZ)?;
//! image.save("teapot.ppm")?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod engine;
pub mod math;
pub mod model;
pub mod projection;
pub mod raster;
pub mod transform;

// Rendering internals, public for tests and benchmarks
pub mod render;

// Re-export commonly needed types at crate root for convenience
pub use camera::{Camera, CameraError, CameraParams};
pub use engine::{render, render_model, Engine, RenderError, ShapeStats};
pub use model::{LoadError, Material, MeshShape, Model};
pub use projection::Frustum;
pub use raster::{Raster, Rgb};
pub use render::rasterizer::{ParseShadingModeError, ShadingMode};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softraster::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, CameraParams};
    pub use crate::projection::Frustum;

    // Engine
    pub use crate::engine::{render, render_model, Engine, RenderError};
    pub use crate::render::rasterizer::ShadingMode;

    // Model
    pub use crate::model::{Material, MeshShape, Model};

    // Output
    pub use crate::raster::{Raster, Rgb};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;
}
