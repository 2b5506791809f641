//! Plain data types shared by the geometry helpers, the gesture engines and
//! the state machine.
//!
//! Every type serialises with camelCase field names so that it maps
//! one-to-one onto the JavaScript objects used by the wasm bindings.

use serde::{Deserialize, Serialize};

/// A two-component vector.
///
/// Used for translations, per-axis flip angles, focal points and resize
/// factors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vector2D<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Vector2D<f64> {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

impl<T: Copy> Size<T> {
    /// Returns the size with width and height exchanged.
    #[inline]
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl Size<f64> {
    /// Returns true if both dimensions are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Axis-aligned rectangle in source pixel space.
///
/// Field names follow the convention of image manipulation libraries that
/// consume the crop descriptor (`originX`, `originY`, `width`, `height`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

/// The canonical transform applied to the image.
///
/// `flip.x` is the rotation around the X axis (vertical flip) and `flip.y`
/// the rotation around the Y axis (horizontal flip). Both are 0 or π once a
/// transition has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub translate: Vector2D<f64>,
    pub scale: f64,
    /// Rotation around the Z axis in radians.
    pub rotation: f64,
    pub flip: Vector2D<f64>,
}

impl TransformState {
    /// The untransformed state at the given base scale.
    pub fn identity(scale: f64) -> Self {
        Self {
            translate: Vector2D::ZERO,
            scale,
            rotation: 0.0,
            flip: Vector2D::ZERO,
        }
    }
}

/// Snapshot returned by `request_state` and passed to `on_update`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropZoomState {
    /// Container width.
    pub width: f64,
    /// Container height.
    pub height: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
}

/// State accepted by `assign_state`.
///
/// Values are sanitized before they are committed, so any finite or
/// non-finite input is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAssignableState {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl From<CropZoomState> for CropAssignableState {
    fn from(state: CropZoomState) -> Self {
        Self {
            translate_x: state.translate_x,
            translate_y: state.translate_y,
            scale: state.scale,
            rotate: state.rotate,
            rotate_x: state.rotate_x,
            rotate_y: state.rotate_y,
        }
    }
}

/// Orientation operations to apply to the source before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropContext {
    /// Clockwise rotation in degrees, one of 0, 90, 180 or 270.
    pub rotation_angle: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

/// Everything an image processing step needs to reproduce the visible crop.
///
/// The consumer applies `context` first (rotation, then flips), scales the
/// result by `resize` and finally cuts `crop` out of it. `crop` is expressed
/// in that resized frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropDescriptor {
    pub crop: Rect,
    pub resize: Vector2D<f64>,
    pub context: CropContext,
}

impl CropDescriptor {
    /// Pixel dimensions of the final output image.
    pub fn output_size(&self) -> Size<f64> {
        Size::new(self.crop.width, self.crop.height)
    }

    /// Size of the oriented source after it has been resized.
    pub fn resized_source(&self, oriented_resolution: Size<f64>) -> Size<f64> {
        Size::new(
            oriented_resolution.width * self.resize.x,
            oriented_resolution.height * self.resize.y,
        )
    }
}

/// Transform list consumed by the rendering layer, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate_z: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
}
