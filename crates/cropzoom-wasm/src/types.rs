//! WASM-compatible wrapper types for crop results.
//!
//! Plain state snapshots cross the boundary as JS objects through
//! serde_wasm_bindgen. The crop descriptor gets a dedicated wrapper so the
//! export pipeline can read it without an intermediate object.

use cropzoom_core::CropDescriptor;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

/// The visible source region plus the operations needed to reproduce it.
///
/// Apply the rotation and flips to the source first, scale the result by
/// `resize_x, resize_y`, then cut out `origin_x, origin_y, width, height`.
/// The rectangle is expressed in the resized frame.
#[wasm_bindgen]
pub struct JsCropDescriptor {
    inner: CropDescriptor,
}

#[wasm_bindgen]
impl JsCropDescriptor {
    #[wasm_bindgen(getter)]
    pub fn origin_x(&self) -> f64 {
        self.inner.crop.origin_x
    }

    #[wasm_bindgen(getter)]
    pub fn origin_y(&self) -> f64 {
        self.inner.crop.origin_y
    }

    /// Crop width in resized source pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.crop.width
    }

    /// Crop height in resized source pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.crop.height
    }

    #[wasm_bindgen(getter)]
    pub fn resize_x(&self) -> f64 {
        self.inner.resize.x
    }

    #[wasm_bindgen(getter)]
    pub fn resize_y(&self) -> f64 {
        self.inner.resize.y
    }

    /// Clockwise rotation in degrees (0, 90, 180 or 270)
    #[wasm_bindgen(getter)]
    pub fn rotation_angle(&self) -> f64 {
        self.inner.context.rotation_angle
    }

    #[wasm_bindgen(getter)]
    pub fn flip_horizontal(&self) -> bool {
        self.inner.context.flip_horizontal
    }

    #[wasm_bindgen(getter)]
    pub fn flip_vertical(&self) -> bool {
        self.inner.context.flip_vertical
    }

    /// Width of the final image after resizing
    #[wasm_bindgen(getter)]
    pub fn output_width(&self) -> f64 {
        self.inner.output_size().width
    }

    /// Height of the final image after resizing
    #[wasm_bindgen(getter)]
    pub fn output_height(&self) -> f64 {
        self.inner.output_size().height
    }

    /// Serialize to a plain JS object
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner)
    }
}

impl From<CropDescriptor> for JsCropDescriptor {
    fn from(inner: CropDescriptor) -> Self {
        Self { inner }
    }
}

/// Serialize a value into a JS object, reporting failures as JS strings.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Deserialize a JS object, prefixing failures with `what`.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropzoom_core::{CropContext, Rect, Vector2D};

    fn descriptor() -> JsCropDescriptor {
        CropDescriptor {
            crop: Rect {
                origin_x: 750.0,
                origin_y: 450.0,
                width: 900.0,
                height: 900.0,
            },
            resize: Vector2D::new(2.0, 2.0),
            context: CropContext {
                rotation_angle: 270.0,
                flip_horizontal: false,
                flip_vertical: true,
            },
        }
        .into()
    }

    #[test]
    fn test_descriptor_getters() {
        let d = descriptor();
        assert_eq!(d.origin_x(), 750.0);
        assert_eq!(d.origin_y(), 450.0);
        assert_eq!(d.width(), 900.0);
        assert_eq!(d.height(), 900.0);
        assert_eq!(d.rotation_angle(), 270.0);
        assert!(!d.flip_horizontal());
        assert!(d.flip_vertical());
    }

    #[test]
    fn test_descriptor_output_size() {
        let d = descriptor();
        assert_eq!(d.resize_x(), 2.0);
        assert_eq!(d.output_width(), 900.0);
        assert_eq!(d.output_height(), 900.0);
    }
}
