//! Depth and normal interpolation for the span shaders.
//!
//! Points are screen positions with normalized depth in `z`. Two families:
//!
//! - **Segment** interpolation between two points `p1`, `p2` (edge endpoints,
//!   or the two ends of a span), parameterized by how far `(x, y)` lies from `p1`.
//! - **Barycentric** interpolation over the whole triangle, weighted by the
//!   signed sub-triangle areas opposite each corner.
//!
//! Each comes in a naive (linear in screen space) and a perspective-corrected
//! (linear in `1/z`) flavor. Interpolated normals are re-normalized.

use crate::math::vec3::Vec3;

/// Below this depth difference the perspective re-parameterization is skipped.
pub const PERSPECTIVE_EPSILON: f32 = 0.0001;

/// Interpolated depth and normal at one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub depth: f32,
    pub normal: Vec3,
}

/// Fraction of the way from `p1` to `p2` at which `(x, y)` lies.
///
/// If the endpoints share a row this is the x-ratio (1 when they coincide);
/// otherwise the distance from `p1` over the segment length.
#[inline]
pub fn edge_alpha(p1: Vec3, p2: Vec3, x: f32, y: f32) -> f32 {
    if p1.y == p2.y {
        if p1.x == p2.x {
            1.0
        } else {
            (x - p1.x) / (p2.x - p1.x)
        }
    } else {
        let (dx, dy) = (x - p1.x, y - p1.y);
        let (sx, sy) = (p2.x - p1.x, p2.y - p1.y);
        (dx * dx + dy * dy).sqrt() / (sx * sx + sy * sy).sqrt()
    }
}

/// Screen-linear depth between `p1` and `p2`.
#[inline]
pub fn lerp_depth(p1: Vec3, p2: Vec3, x: f32, y: f32) -> f32 {
    let alpha = edge_alpha(p1, p2, x, y);
    (1.0 - alpha) * p1.z + alpha * p2.z
}

/// Screen-linear depth and normal between `p1` (normal `n1`) and `p2` (normal `n2`).
pub fn lerp_sample(p1: Vec3, n1: Vec3, p2: Vec3, n2: Vec3, x: f32, y: f32) -> Sample {
    let alpha = edge_alpha(p1, p2, x, y);
    Sample {
        depth: (1.0 - alpha) * p1.z + alpha * p2.z,
        normal: n1.lerp(n2, alpha).normalize_or_self(),
    }
}

/// Perspective-corrected depth and normal between two points.
///
/// Depth is the harmonic blend `1 / ((1 - a) / z1 + a / z2)`. The normal is
/// blended with `1/z` weights, re-parameterized by where the corrected depth
/// falls between `z1` and `z2` unless those are nearly equal.
pub fn perspective_sample(p1: Vec3, n1: Vec3, p2: Vec3, n2: Vec3, x: f32, y: f32) -> Sample {
    let (z1, z2) = (p1.z, p2.z);
    let mut alpha = edge_alpha(p1, p2, x, y);
    let depth = 1.0 / ((1.0 - alpha) / z1 + alpha / z2);
    if (z2 - z1).abs() > PERSPECTIVE_EPSILON {
        alpha = (depth - z1) / (z2 - z1);
    }
    let normal = (n1 * ((1.0 - alpha) / z1) + n2 * (alpha / z2)) * depth;
    Sample {
        depth,
        normal: normal.normalize_or_self(),
    }
}

/// Signed area of the 2D triangle `(a, b, c)`, taken around `b`.
#[inline]
pub fn signed_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    let (u, v) = (a - b, c - b);
    0.5 * (u.x * v.y - v.x * u.y)
}

/// Normalized barycentric weights of `(x, y)` with respect to `corners`.
///
/// Weight `i` is the signed area of the sub-triangle opposite corner `i`
/// divided by their sum, so the weights always add up to 1 (non-finite for a
/// degenerate triangle).
pub fn barycentric_weights(corners: &[Vec3; 3], x: f32, y: f32) -> [f32; 3] {
    let q = Vec3::new(x, y, 0.0);
    let [p1, p2, p3] = *corners;
    let s1 = signed_area(q, p2, p3);
    let s2 = signed_area(q, p3, p1);
    let s3 = signed_area(q, p1, p2);
    let total = s1 + s2 + s3;
    [s1 / total, s2 / total, s3 / total]
}

/// Screen-linear barycentric depth and normal.
pub fn barycentric_sample(corners: &[Vec3; 3], normals: &[Vec3; 3], x: f32, y: f32) -> Sample {
    let w = barycentric_weights(corners, x, y);
    let depth = w[0] * corners[0].z + w[1] * corners[1].z + w[2] * corners[2].z;
    let normal = normals[0] * w[0] + normals[1] * w[1] + normals[2] * w[2];
    Sample {
        depth,
        normal: normal.normalize_or_self(),
    }
}

/// Perspective-corrected barycentric depth and normal: weights are applied to `1/z`.
pub fn barycentric_perspective_sample(
    corners: &[Vec3; 3],
    normals: &[Vec3; 3],
    x: f32,
    y: f32,
) -> Sample {
    let w = barycentric_weights(corners, x, y);
    let inv = [
        w[0] / corners[0].z,
        w[1] / corners[1].z,
        w[2] / corners[2].z,
    ];
    let depth = 1.0 / (inv[0] + inv[1] + inv[2]);
    let normal = (normals[0] * inv[0] + normals[1] * inv[1] + normals[2] * inv[2]) * depth;
    Sample {
        depth,
        normal: normal.normalize_or_self(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CORNERS: [Vec3; 3] = [
        Vec3::new(10.0, 10.0, 0.2),
        Vec3::new(40.0, 15.0, 0.4),
        Vec3::new(20.0, 35.0, 0.8),
    ];

    #[test]
    fn alpha_on_shared_row_uses_x_ratio() {
        let p1 = Vec3::new(2.0, 5.0, 0.0);
        let p2 = Vec3::new(6.0, 5.0, 0.0);
        assert_relative_eq!(edge_alpha(p1, p2, 3.0, 5.0), 0.25);
        assert_relative_eq!(edge_alpha(p1, p1, 2.0, 5.0), 1.0);
    }

    #[test]
    fn alpha_off_row_uses_distance_ratio() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(3.0, 4.0, 0.0);
        assert_relative_eq!(edge_alpha(p1, p2, 1.5, 2.0), 0.5);
        assert_relative_eq!(edge_alpha(p1, p2, 3.0, 4.0), 1.0);
    }

    #[test]
    fn lerp_depth_hits_endpoints_and_midpoint() {
        let p1 = Vec3::new(0.0, 0.0, 0.2);
        let p2 = Vec3::new(0.0, 10.0, 0.6);
        assert_relative_eq!(lerp_depth(p1, p2, 0.0, 0.0), 0.2);
        assert_relative_eq!(lerp_depth(p1, p2, 0.0, 5.0), 0.4);
        assert_relative_eq!(lerp_depth(p1, p2, 0.0, 10.0), 0.6);
    }

    #[test]
    fn lerp_sample_normalizes_blended_normal() {
        let p1 = Vec3::new(0.0, 0.0, 0.5);
        let p2 = Vec3::new(10.0, 0.0, 0.5);
        let s = lerp_sample(p1, Vec3::RIGHT, p2, Vec3::UP, 5.0, 0.0);
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(s.normal, Vec3::new(h, h, 0.0), epsilon = 1e-6);
        assert_relative_eq!(s.depth, 0.5);
    }

    #[test]
    fn perspective_depth_is_harmonic() {
        let p1 = Vec3::new(0.0, 0.0, 0.25);
        let p2 = Vec3::new(10.0, 0.0, 0.75);
        let s = perspective_sample(p1, Vec3::FORWARD, p2, Vec3::FORWARD, 5.0, 0.0);
        // 1 / (0.5 / 0.25 + 0.5 / 0.75) = 0.375
        assert_relative_eq!(s.depth, 0.375, epsilon = 1e-6);
        assert_relative_eq!(s.normal, Vec3::FORWARD, epsilon = 1e-6);
    }

    #[test]
    fn perspective_normal_uses_depth_derived_alpha() {
        let p1 = Vec3::new(0.0, 0.0, 0.25);
        let p2 = Vec3::new(10.0, 0.0, 0.75);
        let s = perspective_sample(p1, Vec3::RIGHT, p2, Vec3::UP, 5.0, 0.0);

        // depth 0.375, alpha' = (0.375 - 0.25) / 0.5 = 0.25,
        // normal = 0.375 * (0.75 / 0.25, 0.25 / 0.75, 0) = (1.125, 0.125, 0).
        assert_relative_eq!(s.depth, 0.375, epsilon = 1e-6);
        let expected = Vec3::new(1.125, 0.125, 0.0).normalize();
        assert_relative_eq!(s.normal, expected, epsilon = 1e-5);

        let linear = lerp_sample(p1, Vec3::RIGHT, p2, Vec3::UP, 5.0, 0.0);
        assert!((linear.normal.x - s.normal.x).abs() > 0.1);
    }

    #[test]
    fn perspective_matches_linear_at_equal_depth() {
        let p1 = Vec3::new(0.0, 0.0, 0.5);
        let p2 = Vec3::new(8.0, 0.0, 0.5);
        let linear = lerp_sample(p1, Vec3::RIGHT, p2, Vec3::UP, 2.0, 0.0);
        let corrected = perspective_sample(p1, Vec3::RIGHT, p2, Vec3::UP, 2.0, 0.0);
        assert_relative_eq!(linear.depth, corrected.depth, epsilon = 1e-6);
        assert_relative_eq!(linear.normal, corrected.normal, epsilon = 1e-5);
    }

    #[test]
    fn sub_areas_sum_to_triangle_area() {
        let [p1, p2, p3] = CORNERS;
        let total = signed_area(p1, p2, p3);
        for (x, y) in [(15.0, 15.0), (25.0, 20.0), (0.0, 0.0), (100.0, -3.0)] {
            let q = Vec3::new(x, y, 0.0);
            let sum = signed_area(q, p2, p3) + signed_area(q, p3, p1) + signed_area(q, p1, p2);
            assert_relative_eq!(sum, total, epsilon = 1e-2);
        }
    }

    #[test]
    fn inside_weights_partition_unity() {
        for (x, y) in [(15.0, 15.0), (25.0, 20.0), (22.0, 25.0)] {
            let w = barycentric_weights(&CORNERS, x, y);
            assert_relative_eq!(w[0] + w[1] + w[2], 1.0, epsilon = 1e-6);
            assert!(w.iter().all(|&wi| (0.0..=1.0).contains(&wi)), "{w:?}");
        }
    }

    #[test]
    fn weights_are_one_at_corners() {
        for (i, corner) in CORNERS.iter().enumerate() {
            let w = barycentric_weights(&CORNERS, corner.x, corner.y);
            for (j, wj) in w.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*wj, expected, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn barycentric_depth_at_corners_and_centroid() {
        let normals = [Vec3::FORWARD; 3];
        for corner in CORNERS {
            let s = barycentric_sample(&CORNERS, &normals, corner.x, corner.y);
            assert_relative_eq!(s.depth, corner.z, epsilon = 1e-6);
            let p = barycentric_perspective_sample(&CORNERS, &normals, corner.x, corner.y);
            assert_relative_eq!(p.depth, corner.z, epsilon = 1e-6);
        }

        let (cx, cy) = (70.0 / 3.0, 20.0);
        let naive = barycentric_sample(&CORNERS, &normals, cx, cy);
        assert_relative_eq!(naive.depth, (0.2 + 0.4 + 0.8) / 3.0, epsilon = 1e-5);
        let corrected = barycentric_perspective_sample(&CORNERS, &normals, cx, cy);
        let harmonic = 3.0 / (1.0 / 0.2 + 1.0 / 0.4 + 1.0 / 0.8);
        assert_relative_eq!(corrected.depth, harmonic, epsilon = 1e-5);
    }

    #[test]
    fn barycentric_perspective_normal_is_weighted_by_inverse_depth() {
        let normals = [Vec3::RIGHT, Vec3::UP, Vec3::FORWARD];
        let (cx, cy) = (70.0 / 3.0, 20.0);

        // Equal weights over z = (0.2, 0.4, 0.8): 1/z terms are (5/3, 5/6, 5/12),
        // depth is 12/35 and the blended normal points along (4, 2, 1).
        let corrected = barycentric_perspective_sample(&CORNERS, &normals, cx, cy);
        assert_relative_eq!(corrected.depth, 12.0 / 35.0, epsilon = 1e-5);
        let expected = Vec3::new(4.0, 2.0, 1.0).normalize();
        assert_relative_eq!(corrected.normal, expected, epsilon = 1e-4);

        let naive = barycentric_sample(&CORNERS, &normals, cx, cy);
        assert_relative_eq!(naive.normal, Vec3::new(1.0, 1.0, 1.0).normalize(), epsilon = 1e-4);
    }

    #[test]
    fn zero_normals_stay_zero() {
        let normals = [Vec3::ZERO; 3];
        let s = barycentric_sample(&CORNERS, &normals, 20.0, 20.0);
        assert_eq!(s.normal, Vec3::ZERO);
    }
}
