//! Off-center perspective frustum.
//!
//! The [`Frustum`] struct is the single source of truth for the six frustum
//! bounds. It generates the projection matrix used by [`Camera`](crate::camera::Camera).

use crate::math::mat4::Mat4;

/// The six bounds of a perspective viewing volume, in camera space.
///
/// `left`/`right`/`top`/`bottom` are measured on the near plane. `near` and
/// `far` are positive distances along the look direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            near,
            far,
        }
    }

    /// A frustum centered on the look axis with the given vertical field of view (radians).
    pub fn symmetric(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let top = near * (fov_y / 2.0).tan();
        let right = top * aspect_ratio;
        Self::new(-right, right, top, -top, near, far)
    }

    /// Width divided by height of the near-plane window.
    pub fn aspect_ratio(&self) -> f32 {
        (self.right - self.left) / (self.top - self.bottom)
    }

    /// Generates the left-handed projection matrix; depth maps to [0, 1] between near and far.
    pub fn matrix(&self) -> Mat4 {
        Mat4::frustum_lh(
            self.left,
            self.right,
            self.top,
            self.bottom,
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn symmetric_frustum_is_centered() {
        let frustum = Frustum::symmetric(FRAC_PI_2, 2.0, 1.0, 100.0);
        assert_relative_eq!(frustum.top, 1.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.right, 2.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.left, -frustum.right);
        assert_relative_eq!(frustum.aspect_ratio(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn off_center_frustum_shifts_projected_center() {
        // The look axis lands at (r + l) / (r - l) in NDC x.
        let frustum = Frustum::new(0.0, 2.0, 1.0, -1.0, 1.0, 10.0);
        let p = (frustum.matrix() * Vec4::point(0.0, 0.0, 5.0)).perspective_divide();
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
    }
}
