//! Linear algebra used by the pipeline.
//!
//! Column-vector convention throughout: `Mat4 * Vec4` transforms a point,
//! and `A * B * v` applies `B` first.

pub mod mat4;
pub mod vec3;
pub mod vec4;
