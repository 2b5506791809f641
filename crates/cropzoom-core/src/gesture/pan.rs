//! Single-pointer drag engine.
//!
//! idle -> dragging -> idle. The translation at gesture start is kept as the
//! baseline; every update proposes `baseline + cumulative delta` filtered
//! through the configured [`PanMode`].

use super::{rubber_band_clamp, PanMode, PanSample, PAN_FRICTION_RATIO};
use crate::bounds::{clamp_translation, within_bounds};
use crate::types::{Size, Vector2D};

/// Baseline captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    offset: Vector2D<f64>,
}

/// Outcome of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSettle {
    /// Translation the state should come to rest at.
    pub target: Vector2D<f64>,
    /// Whether `target` differs from the released translation.
    pub corrected: bool,
    /// Whether the drag ended inside the bounds.
    pub success: bool,
}

impl PanGesture {
    /// Capture the translation at the start of the drag.
    pub fn start(translate: Vector2D<f64>) -> Self {
        Self { offset: translate }
    }

    /// Translation at the start of the drag.
    pub fn offset(&self) -> Vector2D<f64> {
        self.offset
    }

    /// Propose a translation for the given sample.
    ///
    /// `bound` must come from [`crate::bounds::bounds`] at the current scale.
    pub fn update(
        &self,
        sample: &PanSample,
        mode: PanMode,
        bound: Vector2D<f64>,
        crop_size: Size<f64>,
    ) -> Vector2D<f64> {
        let tentative = Vector2D {
            x: self.offset.x + sample.translation.x,
            y: self.offset.y + sample.translation.y,
        };
        constrain(tentative, mode, bound, crop_size)
    }
}

/// Apply a pan mode to a tentative translation.
pub fn constrain(
    tentative: Vector2D<f64>,
    mode: PanMode,
    bound: Vector2D<f64>,
    crop_size: Size<f64>,
) -> Vector2D<f64> {
    match mode {
        PanMode::Clamp => clamp_translation(tentative, bound),
        PanMode::Free => tentative,
        PanMode::Friction => Vector2D {
            x: rubber_band_clamp(
                tentative.x,
                -bound.x,
                bound.x,
                crop_size.width * PAN_FRICTION_RATIO,
            ),
            y: rubber_band_clamp(
                tentative.y,
                -bound.y,
                bound.y,
                crop_size.height * PAN_FRICTION_RATIO,
            ),
        },
    }
}

/// Decide where a released translation comes to rest.
///
/// `Free` leaves the translation wherever it was released; the other modes
/// pull it back into bounds.
pub fn settle(translate: Vector2D<f64>, mode: PanMode, bound: Vector2D<f64>) -> PanSettle {
    let success = within_bounds(translate, bound);
    let target = match mode {
        PanMode::Free => translate,
        PanMode::Clamp | PanMode::Friction => clamp_translation(translate, bound),
    };

    PanSettle {
        target,
        corrected: target != translate,
        success,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
