//! Color constants and the float-to-pixel mappings used by the shaders.

use crate::math::vec3::Vec3;
use crate::raster::Rgb;

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);

/// Background of a freshly created frame.
pub const BACKGROUND: Rgb = BLACK;

/// Converts a [0, 1] channel to a byte, rounding to nearest. Out-of-range values saturate.
#[inline]
pub fn unit_to_byte(value: f32) -> u8 {
    (value * 255.0).round() as u8
}

/// Diffuse RGB in [0, 1] to a pixel color.
#[inline]
pub fn from_diffuse(diffuse: [f32; 3]) -> Rgb {
    Rgb::new(
        unit_to_byte(diffuse[0]),
        unit_to_byte(diffuse[1]),
        unit_to_byte(diffuse[2]),
    )
}

/// Maps a normal's components from [-1, 1] to [0, 255]: `(n + 1) / 2 * 255`.
#[inline]
pub fn from_normal(normal: Vec3) -> Rgb {
    Rgb::new(
        unit_to_byte((normal.x + 1.0) * 0.5),
        unit_to_byte((normal.y + 1.0) * 0.5),
        unit_to_byte((normal.z + 1.0) * 0.5),
    )
}
