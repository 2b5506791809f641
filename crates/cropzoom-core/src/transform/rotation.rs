//! Quarter-turn rotation arithmetic and rotation-aware sizing.
//!
//! Only multiples of 90° are ever committed to the transform state, so every
//! helper here reasons in whole quarter turns. Angles are stored as
//! `quarter_turns * FRAC_PI_2`, which keeps repeated rotation free of
//! accumulated floating point drift.
//!
//! # Frames
//!
//! - The **container** is the pre-rotation image box. It always has the
//!   aspect ratio of the source resolution.
//! - The **detector** is the on-screen box, i.e. the container with width
//!   and height exchanged for odd quarter turns.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::types::Size;

/// Tolerance used when deciding whether an angle is a whole quarter turn.
const QUARTER_TURN_EPSILON: f64 = 1e-9;

/// Number of quarter turns closest to `angle` (radians).
///
/// Positive values are clockwise. The result is not normalized, so a full
/// counter-clockwise turn yields `-4`.
#[inline]
pub fn quarter_turns(angle: f64) -> i64 {
    (angle / FRAC_PI_2).round() as i64
}

/// Returns true if `angle` swaps the horizontal and vertical axes, i.e. it is
/// an odd multiple of 90°.
#[inline]
pub fn swaps_axes(angle: f64) -> bool {
    quarter_turns(angle).rem_euclid(2) == 1
}

/// Normalize an angle into `[0, 2π)`.
///
/// Angles that sit on a quarter turn are snapped exactly onto
/// `k * FRAC_PI_2` for `k` in `0..4`.
pub fn normalize_rotation(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }

    let turns = angle / FRAC_PI_2;
    if (turns - turns.round()).abs() < QUARTER_TURN_EPSILON {
        return quarter_turns(angle).rem_euclid(4) as f64 * FRAC_PI_2;
    }

    let normalized = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if normalized >= TAU {
        0.0
    } else {
        normalized
    }
}

/// Quantize an arbitrary angle down to the quarter turn below it, after
/// normalizing into `[0, 2π)`.
///
/// `-0.1` rad normalizes to just under 2π and therefore lands on 270°.
pub fn floor_to_quarter_turn(angle: f64) -> f64 {
    let normalized = normalize_rotation(angle);
    let turns = normalized / FRAC_PI_2;

    // A value a hair below a quarter turn is treated as that turn
    let quarter = if (turns - turns.round()).abs() < QUARTER_TURN_EPSILON {
        turns.round() as i64
    } else {
        turns.floor() as i64
    };

    quarter.rem_euclid(4) as f64 * FRAC_PI_2
}

/// Rotation expressed in degrees, normalized into `[0, 360)`.
pub fn rotation_degrees(angle: f64) -> f64 {
    let normalized = normalize_rotation(angle);
    let turns = normalized / FRAC_PI_2;
    if (turns - turns.round()).abs() < QUARTER_TURN_EPSILON {
        (turns.round() as i64).rem_euclid(4) as f64 * 90.0
    } else {
        normalized.to_degrees()
    }
}

/// Size of a box after rotating it by `angle`.
///
/// Odd quarter turns exchange width and height; everything else, including
/// any number of full turns, leaves the size untouched.
///
/// # Example
///
/// ```
/// use std::f64::consts::FRAC_PI_2;
/// use cropzoom_core::transform::rotated_size;
/// use cropzoom_core::Size;
///
/// let size = rotated_size(Size::new(400.0, 300.0), FRAC_PI_2);
/// assert_eq!(size, Size::new(300.0, 400.0));
/// ```
#[inline]
pub fn rotated_size<T: Copy>(size: Size<T>, angle: f64) -> Size<T> {
    if swaps_axes(angle) {
        size.swapped()
    } else {
        size
    }
}

/// Compute the pre-rotation container that covers the crop viewport.
///
/// The container keeps the aspect ratio of `resolution`. Once it is rotated
/// by `angle`, its on-screen box matches the crop viewport along one axis
/// and overflows it (or matches it) along the other, so the image always
/// fully covers the viewport at scale 1.
///
/// # Arguments
///
/// * `crop_size` - Fixed on-screen viewport size
/// * `resolution` - Native pixel size of the source image
/// * `angle` - Current rotation in radians
pub fn container_size(crop_size: Size<f64>, resolution: Size<f64>, angle: f64) -> Size<f64> {
    let on_screen_resolution = rotated_size(resolution, angle);

    // Compare aspect ratios by cross multiplication to stay exact for
    // integral sizes.
    let wider_than_crop = on_screen_resolution.width * crop_size.height
        >= crop_size.width * on_screen_resolution.height;

    let on_screen = if wider_than_crop {
        Size::new(
            crop_size.height * on_screen_resolution.width / on_screen_resolution.height,
            crop_size.height,
        )
    } else {
        Size::new(
            crop_size.width,
            crop_size.width * on_screen_resolution.height / on_screen_resolution.width,
        )
    };

    rotated_size(on_screen, angle)
}

/// Largest scale before the container is upsampled past native resolution.
///
/// Returns `max(res.w / container.w, res.h / container.h)`. Callers are
/// responsible for passing sizes where this is at least 1.
#[inline]
pub fn max_scale_from_resolution(container: Size<f64>, resolution: Size<f64>) -> f64 {
    (resolution.width / container.width).max(resolution.height / container.height)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
