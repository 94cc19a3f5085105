//! 4x4 transformation matrix using column-major convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! # Example
//! ```ignore
//! let view = rotation * translation;  // translate first, then rotate
//! let camera_space = view * vertex;
//! ```

use std::ops::{Add, Mul, Sub};

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]` with column-major convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    /// Builds a matrix whose rows are the given vectors.
    pub fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Mat4::new([
            [r0.x, r0.y, r0.z, r0.w],
            [r1.x, r1.y, r1.z, r1.w],
            [r2.x, r2.y, r2.z, r2.w],
            [r3.x, r3.y, r3.z, r3.w],
        ])
    }

    /// Builds a matrix whose columns are the given vectors.
    pub fn from_columns(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self::from_rows(c0, c1, c2, c3).transpose()
    }

    pub fn identity() -> Self {
        Self::diagonal(1.0)
    }

    /// All diagonal entries set to `value`, everything else zero.
    pub fn diagonal(value: f32) -> Self {
        Mat4::new([
            [value, 0.0, 0.0, 0.0],
            [0.0, value, 0.0, 0.0],
            [0.0, 0.0, value, 0.0],
            [0.0, 0.0, 0.0, value],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-major convention).
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation of `degrees` around an arbitrary `axis` (Rodrigues' formula).
    ///
    /// The axis does not need to be normalized.
    ///
    /// ```text
    /// R = I + sin(θ)·K + (1 - cos(θ))·K²
    /// ```
    ///
    /// where `K` is the skew-symmetric cross-product matrix of the unit axis.
    pub fn rotation(degrees: f32, axis: Vec3) -> Self {
        let Vec3 { x, y, z } = axis.normalize();
        let angle = degrees.to_radians();

        let k = Mat4::new([
            [0.0, -z, y, 0.0],
            [z, 0.0, -x, 0.0],
            [-y, x, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
        ]);

        Mat4::identity() + k * angle.sin() + (k * k) * (1.0 - angle.cos())
    }

    /// Creates an off-center perspective frustum matrix (left-handed, depth in [0, 1]).
    ///
    /// Camera-space points at `z = near` map to depth 0 and points at `z = far`
    /// map to depth 1 after the perspective divide. The w row copies camera-space z.
    pub fn frustum_lh(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        Mat4::new([
            [2.0 * near / width, 0.0, (right + left) / width, 0.0],
            [0.0, 2.0 * near / height, (top + bottom) / height, 0.0],
            [0.0, 0.0, far / depth, -(far * near) / depth],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4 { data }
    }

    /// Returns column `index` as a vector.
    pub fn column(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.data[0][index],
            self.data[1][index],
            self.data[2][index],
            self.data[3][index],
        )
    }

    /// Returns row `index` as a vector.
    pub fn row(&self, index: usize) -> Vec4 {
        let [x, y, z, w] = self.data[index];
        Vec4::new(x, y, z, w)
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }

    /// Applies only the upper 3x3 block: rotates/scales a direction, ignoring translation.
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).to_vec3()
    }

    fn zip_with(self, rhs: Mat4, f: impl Fn(f32, f32) -> f32) -> Mat4 {
        let mut data = self.data;
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = f(*value, rhs.data[row][col]);
            }
        }
        Mat4 { data }
    }
}

impl Add<Mat4> for Mat4 {
    type Output = Mat4;

    fn add(self, rhs: Mat4) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub<Mat4> for Mat4 {
    type Output = Mat4;

    fn sub(self, rhs: Mat4) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

/// Scalar multiplication of every element.
impl Mul<f32> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: f32) -> Self::Output {
        self.zip_with(self, |a, _| a * rhs)
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-major convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn translation_moves_points_not_directions() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_relative_eq!(m * Vec4::point(0.0, 0.0, 0.0), Vec4::point(1.0, 2.0, 3.0));
        assert_relative_eq!(
            m * Vec4::direction(1.0, 0.0, 0.0),
            Vec4::direction(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn rotation_about_z_turns_x_into_y() {
        let m = Mat4::rotation(90.0, Vec3::new(0.0, 0.0, 2.0));
        let rotated = m * Vec4::direction(1.0, 0.0, 0.0);
        assert_relative_eq!(rotated, Vec4::direction(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn rotation_is_orthonormal() {
        let m = Mat4::rotation(37.0, Vec3::new(1.0, 2.0, -0.5));
        let product = m * m.transpose();
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_relative_eq!(product.get(row, col), expected, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn multiplication_applies_right_to_left() {
        let scale = Mat4::scaling(2.0, 2.0, 2.0);
        let translate = Mat4::translation(1.0, 0.0, 0.0);
        let p = Vec4::point(1.0, 0.0, 0.0);
        assert_relative_eq!((translate * scale) * p, Vec4::point(3.0, 0.0, 0.0));
        assert_relative_eq!((scale * translate) * p, Vec4::point(4.0, 0.0, 0.0));
    }

    #[test]
    fn columns_and_rows_round_trip() {
        let c0 = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let m = Mat4::from_columns(c0, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO);
        assert_eq!(m.column(0), c0);
        assert_eq!(m.row(1), Vec4::new(2.0, 0.0, 0.0, 0.0));
        assert_eq!(m.transpose().row(0), c0);
    }

    #[test]
    fn frustum_maps_near_and_far_to_unit_depth() {
        let m = Mat4::frustum_lh(-1.0, 1.0, 1.0, -1.0, 1.0, 10.0);
        let near = (m * Vec4::point(0.0, 0.0, 1.0)).perspective_divide();
        let far = (m * Vec4::point(0.0, 0.0, 10.0)).perspective_divide();
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn frustum_maps_side_planes_to_ndc_edges() {
        let m = Mat4::frustum_lh(-2.0, 2.0, 1.0, -1.0, 1.0, 10.0);
        // A point on the right plane at depth 5: x = right * z / near.
        let p = (m * Vec4::point(10.0, 5.0, 5.0)).perspective_divide();
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn diagonal_scales_every_component() {
        let v = Mat4::diagonal(3.0) * Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_relative_eq!(v, Vec4::new(3.0, 6.0, 9.0, 12.0));
    }
}
