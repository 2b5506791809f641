//! CropZoom Core - Gesture-driven crop and zoom engine
//!
//! This crate owns the transform of an image shown inside a fixed crop
//! viewport: translation, scale, quarter-turn rotation and flips. It turns
//! pan, pinch and tap samples into state changes, keeps the image covering
//! the viewport, and reports the visible region as a crop descriptor in
//! source pixel space.
//!
//! # Module Structure
//!
//! - `types` - Value types shared by every module
//! - `transform` - Rotation-aware sizing and crop derivation
//! - `bounds` - Translation bounds for a given scale
//! - `gesture` - Pan and pinch engines
//! - `animation` - Transition records for the animation collaborator
//! - `config` - Construction-time configuration and validation
//! - `cropzoom` - The state machine and its imperative handle
//!
//! # Usage
//!
//! ```ignore
//! use cropzoom_core::{CropZoom, CropZoomConfig, CropZoomHandle, Size};
//!
//! let config = CropZoomConfig::new(Size::new(300.0, 300.0), Size::new(1200.0, 900.0));
//! let mut zoom = CropZoom::new(config)?;
//!
//! zoom.rotate(true, true);
//! let descriptor = zoom.crop(Some(1024.0));
//! ```

pub mod animation;
pub mod bounds;
pub mod config;
pub mod cropzoom;
pub mod gesture;
pub mod transform;
pub mod types;

pub use animation::{Completion, Property, TimingConfig, Transition};
pub use config::{ConfigError, CropMode, CropZoomConfig};
pub use cropzoom::{CropZoom, CropZoomHandle, CropZoomListener, GesturePhase, RotationPhase};
pub use gesture::{PanMode, PanSample, PinchCenteringMode, PinchSample, ScaleMode};
pub use types::{
    CropAssignableState, CropContext, CropDescriptor, CropZoomState, Rect, Size, StyleTransform,
    TransformState, Vector2D,
};
