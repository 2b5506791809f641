//! Translation bounds.
//!
//! The one place that answers "how far may the image be dragged". Both the
//! pan and the pinch engine clamp against it.

use crate::transform::swaps_axes;
use crate::types::{Size, Vector2D};

/// Maximum translation magnitude per axis.
///
/// For the given `scale`, returns `max(0, dim * scale - crop_dim) / 2` per
/// axis: the half-extent the scaled image may travel before one of its edges
/// enters the viewport. For odd quarter turns the container's width maps onto
/// the viewport's vertical axis and vice versa.
///
/// # Arguments
///
/// * `container` - Pre-rotation container size at scale 1
/// * `crop_size` - Viewport size
/// * `rotation` - Current rotation in radians
/// * `scale` - Candidate scale
pub fn bounds(container: Size<f64>, crop_size: Size<f64>, rotation: f64, scale: f64) -> Vector2D<f64> {
    let size = if swaps_axes(rotation) {
        container.swapped()
    } else {
        container
    };

    Vector2D {
        x: (size.width * scale - crop_size.width).max(0.0) / 2.0,
        y: (size.height * scale - crop_size.height).max(0.0) / 2.0,
    }
}

/// Returns true if `translate` lies within `bound` on both axes.
#[inline]
pub fn within_bounds(translate: Vector2D<f64>, bound: Vector2D<f64>) -> bool {
    translate.x.abs() <= bound.x && translate.y.abs() <= bound.y
}

/// Hard clamp a translation into `[-bound, bound]` per axis.
#[inline]
pub fn clamp_translation(translate: Vector2D<f64>, bound: Vector2D<f64>) -> Vector2D<f64> {
    Vector2D {
        x: translate.x.clamp(-bound.x, bound.x),
        y: translate.y.clamp(-bound.y, bound.y),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn size_strategy() -> impl Strategy<Value = Size<f64>> {
        (1.0f64..=2000.0, 1.0f64..=2000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    proptest! {
        /// Property: bounds never decrease as the scale grows.
        #[test]
        fn prop_bounds_monotonic_in_scale(
            container in size_strategy(),
            crop in size_strategy(),
            turns in 0i64..4,
            s1 in 0.1f64..=10.0,
            s2 in 0.1f64..=10.0,
        ) {
            let (lo, hi) = if s1 <= s2 { (s1, s2) } else { (s2, s1) };
            let rotation = turns as f64 * FRAC_PI_2;
            let b_lo = bounds(container, crop, rotation, lo);
            let b_hi = bounds(container, crop, rotation, hi);
            prop_assert!(b_lo.x <= b_hi.x);
            prop_assert!(b_lo.y <= b_hi.y);
        }

        /// Property: bounds are zero when the scaled image fits in the viewport.
        #[test]
        fn prop_bounds_zero_when_fitting(
            crop in size_strategy(),
            fraction in 0.01f64..=1.0,
            scale in 0.1f64..=1.0,
        ) {
            let container = Size::new(crop.width * fraction, crop.height * fraction);
            let b = bounds(container, crop, 0.0, scale);
            prop_assert_eq!(b, Vector2D::ZERO);
        }

        /// Property: clamped translations are always within bounds.
        #[test]
        fn prop_clamp_is_within(
            tx in -5000.0f64..=5000.0,
            ty in -5000.0f64..=5000.0,
            bx in 0.0f64..=1000.0,
            by in 0.0f64..=1000.0,
        ) {
            let bound = Vector2D::new(bx, by);
            prop_assert!(within_bounds(clamp_translation(Vector2D::new(tx, ty), bound), bound));
        }
    }
}
