//! Vertex transform stage.
//!
//! Takes mesh-space vertex positions to pixel coordinates with a normalized
//! depth, and rotates normals into camera space.
//!
//! ```text
//! world ──perspective──▶ clip ──÷w──▶ NDC ──viewport──▶ screen
//!                                     x,y ∈ [-1,1]       px ∈ [0,width]
//!                                     z   ∈ [0,1]        py ∈ [0,height] (y down)
//! ```

use crate::camera::Camera;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

/// A projected vertex: pixel x, pixel y, normalized depth, plus the index of
/// the mesh vertex it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenVertex {
    /// `x`/`y` in pixels, `z` is the post-divide depth (not clamped).
    pub position: Vec3,
    pub source_index: usize,
}

impl ScreenVertex {
    pub fn new(position: Vec3, source_index: usize) -> Self {
        Self {
            position,
            source_index,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.position.z
    }
}

/// Maps an NDC point to pixel coordinates. Image y grows downward; depth passes through.
#[inline]
pub fn ndc_to_screen(ndc: Vec3, width: u32, height: u32) -> Vec3 {
    Vec3::new(
        (ndc.x + 1.0) * width as f32 / 2.0,
        (1.0 - ndc.y) * height as f32 / 2.0,
        ndc.z,
    )
}

/// Projects a flat `[x, y, z, x, y, z, ...]` position list into screen space.
///
/// A trailing partial triple is ignored.
pub fn project_vertices(
    positions: &[f32],
    camera: &Camera,
    width: u32,
    height: u32,
) -> Vec<ScreenVertex> {
    let perspective = camera.perspective();

    positions
        .chunks_exact(3)
        .enumerate()
        .map(|(index, p)| {
            let clip = perspective * Vec4::point(p[0], p[1], p[2]);
            let screen = ndc_to_screen(clip.perspective_divide(), width, height);
            ScreenVertex::new(screen, index)
        })
        .collect()
}

/// Rotates a flat normal list into camera space. No translation, no divide,
/// no re-normalization.
pub fn rotate_normals(normals: &[f32], camera: &Camera) -> Vec<Vec3> {
    let rotation = camera.rotation();

    normals
        .chunks_exact(3)
        .map(|n| rotation.transform_direction(Vec3::new(n[0], n[1], n[2])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraParams;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new(&CameraParams::from_array([
            -1.0, 1.0, 1.0, -1.0, 1.0, 10.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        ]))
    }

    #[test]
    fn ndc_corners_land_on_raster_corners() {
        let (w, h) = (640, 480);
        assert_relative_eq!(
            ndc_to_screen(Vec3::new(-1.0, 1.0, 0.3), w, h),
            Vec3::new(0.0, 0.0, 0.3)
        );
        assert_relative_eq!(
            ndc_to_screen(Vec3::new(1.0, -1.0, 0.3), w, h),
            Vec3::new(640.0, 480.0, 0.3)
        );
    }

    #[test]
    fn ndc_square_stays_inside_raster() {
        let (w, h) = (37, 23);
        for i in 0..=10 {
            for j in 0..=10 {
                let ndc = Vec3::new(-1.0 + i as f32 * 0.2, -1.0 + j as f32 * 0.2, 0.5);
                let s = ndc_to_screen(ndc, w, h);
                assert!(s.x >= -1e-4 && s.x <= w as f32 + 1e-4);
                assert!(s.y >= -1e-4 && s.y <= h as f32 + 1e-4);
            }
        }
    }

    #[test]
    fn projection_keeps_source_index_and_centers_look_target() {
        let positions = [0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 9.0];
        let projected = project_vertices(&positions, &camera(), 100, 100);

        assert_eq!(projected.len(), 2);
        assert_eq!(projected[1].source_index, 1);
        assert_relative_eq!(projected[0].x(), 50.0, epsilon = 1e-4);
        assert_relative_eq!(projected[0].y(), 50.0, epsilon = 1e-4);
        // Camera-space depth 5 in a [1, 10] frustum.
        assert_relative_eq!(projected[0].depth(), (10.0 / 9.0) * (1.0 - 1.0 / 5.0), epsilon = 1e-5);
        // +x world is camera right, +y world is up (smaller pixel y).
        assert!(projected[1].x() > 50.0);
        assert!(projected[1].y() < 50.0);
    }

    #[test]
    fn normals_rotate_without_renormalizing() {
        let normals = rotate_normals(&[0.0, 0.0, 2.0], &camera());
        // World +z faces the eye, which is camera -z.
        assert_relative_eq!(normals[0], Vec3::new(0.0, 0.0, -2.0), epsilon = 1e-6);
    }
}
