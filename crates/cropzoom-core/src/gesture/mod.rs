//! Gesture engines that map pan and pinch samples onto transform proposals.
//!
//! The engines never write state. Each gesture keeps its own baseline
//! (captured at start, dropped at end) and turns incoming samples into
//! *proposed* translation and scale values; the state machine commits them.
//!
//! ## Policies
//!
//! - [`PanMode`]: behaviour of the translation past its bounds
//! - [`ScaleMode`]: behaviour of the scale past its limits
//! - [`PinchCenteringMode`]: how translation is constrained while pinching
//!
//! ## Damping
//!
//! Rubber banding uses `limit * e / (limit + e)` on the excess `e`. The curve
//! is monotonic, starts with slope 1 and approaches `limit` asymptotically,
//! so the value keeps moving in the drag direction but can never travel more
//! than `limit` past the boundary.

pub mod pan;
pub mod pinch;

pub use pan::{PanGesture, PanSettle};
pub use pinch::{PinchGesture, PinchOptions, PinchSettle, ScaleLimits};

use serde::{Deserialize, Serialize};

use crate::types::Vector2D;

/// Fraction of the viewport dimension that friction panning may overshoot.
pub const PAN_FRICTION_RATIO: f64 = 0.35;

/// Fraction of a scale limit that bounce pinching may overshoot.
pub const SCALE_BOUNCE_RATIO: f64 = 0.5;

/// Out-of-bounds behaviour for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanMode {
    /// Hard clamp into bounds.
    Clamp,
    /// No clamping at all.
    #[default]
    Free,
    /// Rubber band past the bounds, settled on release.
    Friction,
}

/// Out-of-range behaviour for scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Hard clamp into `[min, max]`.
    Clamp,
    /// Rubber band past the limits, settled on release.
    #[default]
    Bounce,
}

/// Translation constraint applied while a pinch is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinchCenteringMode {
    /// Hard clamp into the bounds of the current scale.
    Clamp,
    /// Follow the focal point, constrained by the pan mode.
    #[default]
    Sync,
}

/// A pan sample from the gesture recognizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanSample {
    /// Cumulative translation since the gesture started.
    pub translation: Vector2D<f64>,
}

impl PanSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            translation: Vector2D::new(x, y),
        }
    }
}

/// A pinch sample from the gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchSample {
    /// Focal point relative to the center of the crop viewport.
    pub focal: Vector2D<f64>,
    /// Scale factor relative to the start of the gesture.
    pub scale: f64,
}

impl Default for PinchSample {
    fn default() -> Self {
        Self {
            focal: Vector2D::ZERO,
            scale: 1.0,
        }
    }
}

/// Damped displacement for an excess `delta` past a boundary.
///
/// Returns `sign(delta) * limit * |delta| / (limit + |delta|)`, or 0 for a
/// non-positive limit.
pub fn rubber_band(delta: f64, limit: f64) -> f64 {
    if limit <= 0.0 || delta.is_nan() {
        return 0.0;
    }
    if delta.is_infinite() {
        return delta.signum() * limit;
    }
    let abs = delta.abs();
    // Divide first so huge excesses cannot overflow the product
    delta.signum() * limit * (abs / (limit + abs))
}

/// Pass `value` through when inside `[min, max]`, otherwise damp the excess.
pub fn rubber_band_clamp(value: f64, min: f64, max: f64, limit: f64) -> f64 {
    if value < min {
        min + rubber_band(value - min, limit)
    } else if value > max {
        max + rubber_band(value - max, limit)
    } else {
        value
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
