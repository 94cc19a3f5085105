//! Pinhole camera built from frustum bounds and eye/center/up vectors.
//!
//! # Coordinate System
//!
//! Camera space is **left-handed**:
//! - X: positive right
//! - Y: positive up
//! - Z: positive along the look direction (into the screen)
//!
//! A [`Camera`] is immutable. Changing any parameter means building a new one
//! from a fresh [`CameraParams`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::projection::Frustum;

/// Number of floats in a camera description.
pub const CAMERA_PARAM_COUNT: usize = 15;

/// Errors produced while reading camera parameters.
#[derive(Debug)]
pub enum CameraError {
    Io(std::io::Error),
    /// A token could not be parsed as a float.
    Parse { index: usize, token: String },
    /// The source did not contain exactly [`CAMERA_PARAM_COUNT`] values.
    Count { found: usize },
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Io(e) => write!(f, "failed to read camera file: {e}"),
            CameraError::Parse { index, token } => {
                write!(f, "camera value #{index} is not a number: {token:?}")
            }
            CameraError::Count { found } => write!(
                f,
                "expected {CAMERA_PARAM_COUNT} camera values, found {found}"
            ),
        }
    }
}

impl std::error::Error for CameraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CameraError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CameraError {
    fn from(e: std::io::Error) -> Self {
        CameraError::Io(e)
    }
}

/// Raw camera description: frustum bounds plus world-space eye, center, and up.
///
/// The flat ordering is `left right top bottom near far eye.xyz center.xyz up.xyz`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    pub frustum: Frustum,
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl CameraParams {
    pub fn new(frustum: Frustum, eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self {
            frustum,
            eye,
            center,
            up,
        }
    }

    /// Builds parameters from the fixed 15-float ordering.
    pub fn from_array(p: [f32; CAMERA_PARAM_COUNT]) -> Self {
        Self {
            frustum: Frustum::new(p[0], p[1], p[2], p[3], p[4], p[5]),
            eye: Vec3::new(p[6], p[7], p[8]),
            center: Vec3::new(p[9], p[10], p[11]),
            up: Vec3::new(p[12], p[13], p[14]),
        }
    }

    pub fn from_slice(values: &[f32]) -> Result<Self, CameraError> {
        let array: [f32; CAMERA_PARAM_COUNT] = values
            .try_into()
            .map_err(|_| CameraError::Count {
                found: values.len(),
            })?;
        Ok(Self::from_array(array))
    }

    /// Parses whitespace- or comma-separated floats. `#` starts a comment that runs to end of line.
    pub fn parse(text: &str) -> Result<Self, CameraError> {
        let values = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ','))
            .filter(|token| !token.is_empty())
            .enumerate()
            .map(|(index, token)| {
                token.parse::<f32>().map_err(|_| CameraError::Parse {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f32>, CameraError>>()?;

        Self::from_slice(&values)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Flattens back into the fixed 15-float ordering.
    pub fn to_array(&self) -> [f32; CAMERA_PARAM_COUNT] {
        let f = &self.frustum;
        [
            f.left,
            f.right,
            f.top,
            f.bottom,
            f.near,
            f.far,
            self.eye.x,
            self.eye.y,
            self.eye.z,
            self.center.x,
            self.center.y,
            self.center.z,
            self.up.x,
            self.up.y,
            self.up.z,
        ]
    }
}

impl FromStr for CameraParams {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Camera matrices that take world-space points to clip space.
///
/// `perspective = projection * rotation * translation`. Normals use `rotation` alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    projection: Mat4,
    rotation: Mat4,
    translation: Mat4,
    perspective: Mat4,
}

impl Camera {
    /// Builds all camera matrices from `params`.
    ///
    /// Degenerate inputs (eye == center, up parallel to the look direction,
    /// near == far) are not checked; they produce NaN/inf entries.
    pub fn new(params: &CameraParams) -> Self {
        let projection = params.frustum.matrix();
        let rotation = Self::view_rotation(params.eye, params.center, params.up);
        let eye = params.eye;
        let translation = Mat4::translation(-eye.x, -eye.y, -eye.z);

        Self {
            projection,
            rotation,
            translation,
            perspective: projection * rotation * translation,
        }
    }

    /// Rotation whose rows are the camera's right, up, and look axes.
    ///
    /// `up` is normalized but not re-orthogonalized against `look`.
    fn view_rotation(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
        let look = (center - eye).normalize();
        let up = up.normalize();
        let right = look.cross(up).normalize();

        Mat4::from_rows(
            Vec4::from_vec3(right, 0.0),
            Vec4::from_vec3(up, 0.0),
            Vec4::from_vec3(look, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn rotation(&self) -> Mat4 {
        self.rotation
    }

    pub fn translation(&self) -> Mat4 {
        self.translation
    }

    /// The combined world to clip-space matrix.
    pub fn perspective(&self) -> Mat4 {
        self.perspective
    }
}

impl From<&CameraParams> for Camera {
    fn from(params: &CameraParams) -> Self {
        Camera::new(params)
    }
}
