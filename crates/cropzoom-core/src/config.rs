//! Construction-time configuration and its validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::TimingConfig;
use crate::gesture::{PanMode, PinchCenteringMode, ScaleMode};
use crate::types::Size;

/// Error types for invalid configuration.
///
/// These are programming errors in the caller's setup, detected once when
/// the engine is created and never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Managed mode wraps exactly one child.
    #[error("CropZoom expected one child but received {0} children")]
    ExpectedOneChild(usize),

    /// Overlay mode renders no children of its own.
    #[error("CropZoom expected no children but received {0} children")]
    ExpectedNoChildren(usize),

    #[error("minScale property must be greater than or equals one")]
    MinScaleBelowOne,

    #[error("maxScale property must be greater than or equals one")]
    MaxScaleBelowOne,

    #[error("minScale property must not be greater than maxScale")]
    MinScaleAboveMaxScale,

    /// Crop size or resolution is zero, negative or not finite.
    #[error("{0} must have a positive, finite width and height")]
    InvalidSize(&'static str),
}

/// How the component hosts the image it crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// The component wraps and transforms a single visual child.
    #[default]
    Managed,
    /// The component only provides the gesture surface and overlay; the
    /// host renders the image from the reported transform.
    Overlay,
}

/// Configuration for a [`crate::CropZoom`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropZoomConfig {
    /// On-screen size of the crop viewport.
    pub crop_size: Size<f64>,
    /// Native resolution of the source image.
    pub resolution: Size<f64>,
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    /// Upper scale limit; derived from the resolution when absent.
    #[serde(default)]
    pub max_scale: Option<f64>,
    #[serde(default)]
    pub scale_mode: ScaleMode,
    #[serde(default)]
    pub pan_mode: PanMode,
    #[serde(default)]
    pub pinch_centering: PinchCenteringMode,
    #[serde(default = "default_allow_pinch_panning")]
    pub allow_pinch_panning: bool,
    #[serde(default)]
    pub mode: CropMode,
    /// Number of visual children supplied by the host.
    #[serde(default = "default_child_count")]
    pub child_count: usize,
    #[serde(default)]
    pub timing: TimingConfig,
}

fn default_min_scale() -> f64 {
    1.0
}

fn default_allow_pinch_panning() -> bool {
    true
}

fn default_child_count() -> usize {
    1
}

impl CropZoomConfig {
    /// Managed-mode configuration with default policies.
    pub fn new(crop_size: Size<f64>, resolution: Size<f64>) -> Self {
        Self {
            crop_size,
            resolution,
            min_scale: default_min_scale(),
            max_scale: None,
            scale_mode: ScaleMode::default(),
            pan_mode: PanMode::default(),
            pinch_centering: PinchCenteringMode::default(),
            allow_pinch_panning: default_allow_pinch_panning(),
            mode: CropMode::Managed,
            child_count: default_child_count(),
            timing: TimingConfig::default(),
        }
    }

    /// Check the configuration, failing on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            CropMode::Managed if self.child_count != 1 => {
                return Err(ConfigError::ExpectedOneChild(self.child_count));
            }
            CropMode::Overlay if self.child_count != 0 => {
                return Err(ConfigError::ExpectedNoChildren(self.child_count));
            }
            _ => {}
        }

        if !self.min_scale.is_finite() || self.min_scale < 1.0 {
            return Err(ConfigError::MinScaleBelowOne);
        }

        if let Some(max_scale) = self.max_scale {
            if max_scale.is_nan() || max_scale < 1.0 {
                return Err(ConfigError::MaxScaleBelowOne);
            }
            if self.min_scale > max_scale {
                return Err(ConfigError::MinScaleAboveMaxScale);
            }
        }

        if !self.crop_size.is_positive() {
            return Err(ConfigError::InvalidSize("cropSize"));
        }
        if !self.resolution.is_positive() {
            return Err(ConfigError::InvalidSize("resolution"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CropZoomConfig {
        CropZoomConfig::new(Size::new(300.0, 300.0), Size::new(1200.0, 900.0))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn test_managed_requires_one_child() {
        let mut cfg = config();
        cfg.child_count = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ExpectedOneChild(0)));

        cfg.child_count = 2;
        assert_eq!(cfg.validate(), Err(ConfigError::ExpectedOneChild(2)));
    }

    #[test]
    fn test_overlay_requires_no_children() {
        let mut cfg = config();
        cfg.mode = CropMode::Overlay;
        assert_eq!(cfg.validate(), Err(ConfigError::ExpectedNoChildren(1)));

        cfg.child_count = 0;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_min_scale_below_one() {
        let mut cfg = config();
        cfg.min_scale = 0.5;
        assert_eq!(cfg.validate(), Err(ConfigError::MinScaleBelowOne));

        cfg.min_scale = f64::NAN;
        assert_eq!(cfg.validate(), Err(ConfigError::MinScaleBelowOne));
    }

    #[test]
    fn test_max_scale_below_one() {
        let mut cfg = config();
        cfg.max_scale = Some(0.9);
        assert_eq!(cfg.validate(), Err(ConfigError::MaxScaleBelowOne));
    }

    #[test]
    fn test_min_above_max() {
        let mut cfg = config();
        cfg.min_scale = 3.0;
        cfg.max_scale = Some(2.0);
        assert_eq!(cfg.validate(), Err(ConfigError::MinScaleAboveMaxScale));

        cfg.max_scale = Some(3.0);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_sizes() {
        let mut cfg = config();
        cfg.crop_size = Size::new(0.0, 300.0);
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidSize("cropSize")));

        let mut cfg = config();
        cfg.resolution = Size::new(1200.0, f64::INFINITY);
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidSize("resolution")));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::ExpectedOneChild(3).to_string(),
            "CropZoom expected one child but received 3 children"
        );
        assert_eq!(
            ConfigError::MinScaleAboveMaxScale.to_string(),
            "minScale property must not be greater than maxScale"
        );
        assert_eq!(
            ConfigError::InvalidSize("resolution").to_string(),
            "resolution must have a positive, finite width and height"
        );
    }
}
