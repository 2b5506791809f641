//! Two-finger pinch engine.
//!
//! idle -> pinching -> idle. At start the engine captures the baseline scale,
//! the baseline translation and the focal point's distance from the image
//! center. Updates propose a new scale (filtered by [`ScaleMode`]) and a
//! translation that keeps the image point under the initial focal point
//! stationary:
//!
//! ```text
//! T = T0 + origin * (1 - s / s0) [+ focal - focal0 when pinch panning]
//! origin = focal0 - T0
//! ```
//!
//! The translation is then constrained against the bounds of the *new*
//! scale, because growing or shrinking the image changes how far it may
//! travel.

use super::pan::constrain;
use super::{
    rubber_band_clamp, PanMode, PinchCenteringMode, PinchSample, ScaleMode, SCALE_BOUNCE_RATIO,
};
use crate::bounds::{clamp_translation, within_bounds};
use crate::types::{Size, Vector2D};

/// Inclusive scale range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl ScaleLimits {
    /// Hard clamp a scale into the range.
    #[inline]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min && scale <= self.max
    }
}

/// Policies that shape a pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchOptions {
    pub limits: ScaleLimits,
    pub scale_mode: ScaleMode,
    pub pan_mode: PanMode,
    pub centering: PinchCenteringMode,
    /// Let the focal point's movement translate the image.
    pub allow_panning: bool,
    pub crop_size: Size<f64>,
}

/// Baseline captured when a pinch starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    scale_offset: f64,
    offset: Vector2D<f64>,
    focal: Vector2D<f64>,
    origin: Vector2D<f64>,
}

/// Outcome of releasing a pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSettle {
    pub scale: f64,
    pub translate: Vector2D<f64>,
    pub scale_corrected: bool,
    pub translate_corrected: bool,
    /// Whether the released translation was inside the released scale's
    /// bounds.
    pub in_bounds: bool,
}

impl PinchSettle {
    /// True when the pinch ended in range without any correction.
    pub fn success(&self) -> bool {
        !self.scale_corrected && !self.translate_corrected && self.in_bounds
    }
}

impl PinchGesture {
    /// Capture the baseline for a new pinch.
    pub fn start(sample: &PinchSample, translate: Vector2D<f64>, scale: f64) -> Self {
        Self {
            scale_offset: scale,
            offset: translate,
            focal: sample.focal,
            origin: Vector2D {
                x: sample.focal.x - translate.x,
                y: sample.focal.y - translate.y,
            },
        }
    }

    /// Scale at the start of the pinch.
    pub fn scale_offset(&self) -> f64 {
        self.scale_offset
    }

    /// Propose a scale for the given sample.
    pub fn scale(&self, sample: &PinchSample, limits: ScaleLimits, mode: ScaleMode) -> f64 {
        let factor = if sample.scale.is_finite() && sample.scale > 0.0 {
            sample.scale
        } else {
            1.0
        };
        let tentative = self.scale_offset * factor;
        if !tentative.is_finite() {
            return limits.max;
        }

        match mode {
            ScaleMode::Clamp => limits.clamp(tentative),
            ScaleMode::Bounce => {
                let limit = if tentative > limits.max {
                    limits.max * SCALE_BOUNCE_RATIO
                } else {
                    limits.min * SCALE_BOUNCE_RATIO
                };
                rubber_band_clamp(tentative, limits.min, limits.max, limit)
            }
        }
    }

    /// Unconstrained translation that keeps the focal point stationary at
    /// `scale`.
    pub fn centered_translation(
        &self,
        sample: &PinchSample,
        scale: f64,
        allow_panning: bool,
    ) -> Vector2D<f64> {
        let ratio = 1.0 - scale / self.scale_offset;
        let (pan_x, pan_y) = if allow_panning {
            (sample.focal.x - self.focal.x, sample.focal.y - self.focal.y)
        } else {
            (0.0, 0.0)
        };

        Vector2D {
            x: self.offset.x + self.origin.x * ratio + pan_x,
            y: self.offset.y + self.origin.y * ratio + pan_y,
        }
    }

    /// Propose scale and translation for the given sample.
    ///
    /// `bounds_at` maps a candidate scale to its translation bounds.
    pub fn update(
        &self,
        sample: &PinchSample,
        options: &PinchOptions,
        bounds_at: impl Fn(f64) -> Vector2D<f64>,
    ) -> (f64, Vector2D<f64>) {
        let scale = self.scale(sample, options.limits, options.scale_mode);
        let tentative = self.centered_translation(sample, scale, options.allow_panning);
        let bound = bounds_at(scale);

        let translate = match options.centering {
            PinchCenteringMode::Clamp => clamp_translation(tentative, bound),
            PinchCenteringMode::Sync => {
                constrain(tentative, options.pan_mode, bound, options.crop_size)
            }
        };

        (scale, translate)
    }
}

/// Decide where a released pinch comes to rest.
///
/// The scale is always pulled into its limits. The translation is clamped
/// against the bounds of the settled scale, except under [`PanMode::Free`]
/// when the scale itself needed no correction.
pub fn settle(
    scale: f64,
    translate: Vector2D<f64>,
    limits: ScaleLimits,
    pan_mode: PanMode,
    bounds_at: impl Fn(f64) -> Vector2D<f64>,
) -> PinchSettle {
    let settled_scale = limits.clamp(scale);
    let scale_corrected = settled_scale != scale;
    let in_bounds = within_bounds(translate, bounds_at(scale));

    let bound = bounds_at(settled_scale);
    let settled_translate = if pan_mode == PanMode::Free && !scale_corrected {
        translate
    } else {
        clamp_translation(translate, bound)
    };

    PinchSettle {
        scale: settled_scale,
        translate: settled_translate,
        scale_corrected,
        translate_corrected: settled_translate != translate,
        in_bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::bounds;

    const CONTAINER: Size<f64> = Size {
        width: 400.0,
        height: 300.0,
    };
    const CROP: Size<f64> = Size {
        width: 300.0,
        height: 300.0,
    };
    const LIMITS: ScaleLimits = ScaleLimits { min: 1.0, max: 3.0 };

    fn options(scale_mode: ScaleMode, pan_mode: PanMode) -> PinchOptions {
        PinchOptions {
            limits: LIMITS,
            scale_mode,
            pan_mode,
            centering: PinchCenteringMode::Sync,
            allow_panning: true,
            crop_size: CROP,
        }
    }

    fn bounds_at(scale: f64) -> Vector2D<f64> {
        bounds(CONTAINER, CROP, 0.0, scale)
    }

    fn sample(fx: f64, fy: f64, scale: f64) -> PinchSample {
        PinchSample {
            focal: Vector2D::new(fx, fy),
            scale,
        }
    }

    #[test]
    fn test_scale_multiplies_baseline() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 1.5);
        assert_eq!(pinch.scale(&sample(0.0, 0.0, 1.5), LIMITS, ScaleMode::Clamp), 2.25);
    }

    #[test]
    fn test_scale_clamp_mode() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 2.0);
        assert_eq!(pinch.scale(&sample(0.0, 0.0, 4.0), LIMITS, ScaleMode::Clamp), 3.0);
        assert_eq!(pinch.scale(&sample(0.0, 0.0, 0.1), LIMITS, ScaleMode::Clamp), 1.0);
    }

    #[test]
    fn test_scale_bounce_mode() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 2.0);

        let above = pinch.scale(&sample(0.0, 0.0, 4.0), LIMITS, ScaleMode::Bounce);
        assert!(above > 3.0 && above < 3.0 + 3.0 * SCALE_BOUNCE_RATIO);

        let below = pinch.scale(&sample(0.0, 0.0, 0.1), LIMITS, ScaleMode::Bounce);
        assert!(below < 1.0 && below > 1.0 - SCALE_BOUNCE_RATIO);
    }

    #[test]
    fn test_invalid_scale_factor_ignored() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 2.0);
        assert_eq!(pinch.scale(&sample(0.0, 0.0, f64::NAN), LIMITS, ScaleMode::Clamp), 2.0);
        assert_eq!(pinch.scale(&sample(0.0, 0.0, 0.0), LIMITS, ScaleMode::Clamp), 2.0);
    }

    #[test]
    fn test_overflowing_scale_stays_finite() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 2.0);
        assert_eq!(pinch.scale_offset(), 2.0);

        for mode in [ScaleMode::Bounce, ScaleMode::Clamp] {
            let scale = pinch.scale(&sample(0.0, 0.0, f64::MAX), LIMITS, mode);
            assert_eq!(scale, 3.0);

            let settled = settle(scale, Vector2D::ZERO, LIMITS, PanMode::Clamp, bounds_at);
            assert_eq!(settled.scale, 3.0);
            assert!(!settled.scale_corrected);
        }

        // Large but finite excess is damped, not propagated
        let near = pinch.scale(&sample(0.0, 0.0, f64::MAX / 4.0), LIMITS, ScaleMode::Bounce);
        assert!(near.is_finite() && near <= 3.0 + 3.0 * SCALE_BOUNCE_RATIO);
    }

    #[test]
    fn test_center_pinch_keeps_translation() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 1.0);
        let t = pinch.centered_translation(&sample(0.0, 0.0, 2.0), 2.0, true);
        assert_eq!(t, Vector2D::ZERO);
    }

    #[test]
    fn test_focal_point_stays_fixed() {
        let start_translate = Vector2D::new(10.0, -20.0);
        let start = sample(60.0, 30.0, 1.0);
        let pinch = PinchGesture::start(&start, start_translate, 1.0);

        let scale = 2.0;
        let t = pinch.centered_translation(&sample(60.0, 30.0, 2.0), scale, false);

        // Image-local point under the focal point at start
        let qx = (start.focal.x - start_translate.x) / 1.0;
        let qy = (start.focal.y - start_translate.y) / 1.0;

        assert!((t.x + scale * qx - start.focal.x).abs() < 1e-9);
        assert!((t.y + scale * qy - start.focal.y).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_panning_follows_focal() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 2.0);

        let with_pan = pinch.centered_translation(&sample(25.0, -15.0, 1.0), 2.0, true);
        assert_eq!(with_pan, Vector2D::new(25.0, -15.0));

        let without_pan = pinch.centered_translation(&sample(25.0, -15.0, 1.0), 2.0, false);
        assert_eq!(without_pan, Vector2D::ZERO);
    }

    #[test]
    fn test_update_clamps_translation_to_new_bounds() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 2.0);
        let (scale, t) = pinch.update(
            &sample(1000.0, 1000.0, 1.0),
            &options(ScaleMode::Clamp, PanMode::Clamp),
            bounds_at,
        );

        assert_eq!(scale, 2.0);
        assert_eq!(t, bounds_at(2.0));
    }

    #[test]
    fn test_update_clamp_centering_ignores_pan_mode() {
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), Vector2D::ZERO, 2.0);
        let opts = PinchOptions {
            centering: PinchCenteringMode::Clamp,
            ..options(ScaleMode::Clamp, PanMode::Free)
        };
        let (_, t) = pinch.update(&sample(1000.0, 0.0, 1.0), &opts, bounds_at);
        assert_eq!(t.x, bounds_at(2.0).x);
    }

    #[test]
    fn test_zoom_out_shrinks_allowed_translation() {
        // Start zoomed in and panned to the edge
        let edge = bounds_at(3.0);
        let pinch = PinchGesture::start(&sample(0.0, 0.0, 1.0), edge, 3.0);
        let (scale, t) = pinch.update(
            &sample(0.0, 0.0, 0.5),
            &options(ScaleMode::Clamp, PanMode::Clamp),
            bounds_at,
        );

        assert_eq!(scale, 1.5);
        assert!(within_bounds(t, bounds_at(1.5)));
    }

    #[test]
    fn test_settle_in_range() {
        let result = settle(2.0, Vector2D::new(10.0, 0.0), LIMITS, PanMode::Clamp, bounds_at);
        assert!(result.success());
        assert_eq!(result.scale, 2.0);
        assert_eq!(result.translate, Vector2D::new(10.0, 0.0));
    }

    #[test]
    fn test_settle_bounce_overshoot() {
        let result = settle(3.6, Vector2D::new(900.0, 0.0), LIMITS, PanMode::Clamp, bounds_at);
        assert!(!result.success());
        assert!(result.scale_corrected);
        assert_eq!(result.scale, 3.0);
        assert_eq!(result.translate, Vector2D::new(bounds_at(3.0).x, 0.0));
    }

    #[test]
    fn test_settle_free_keeps_translation_when_scale_valid() {
        let result = settle(2.0, Vector2D::new(900.0, 0.0), LIMITS, PanMode::Free, bounds_at);
        assert_eq!(result.translate, Vector2D::new(900.0, 0.0));
        assert!(!result.scale_corrected);
        assert!(!result.success());
    }

    #[test]
    fn test_settle_free_clamps_after_scale_correction() {
        let result = settle(0.7, Vector2D::new(900.0, 0.0), LIMITS, PanMode::Free, bounds_at);
        assert_eq!(result.scale, 1.0);
        assert_eq!(result.translate, Vector2D::new(bounds_at(1.0).x, 0.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
