//! Transition records handed to the animation collaborator.
//!
//! The engine never interpolates. Every committed change is pushed as a
//! [`Transition`] carrying the target value and whether it should animate;
//! the host drains them, drives its own tweening, and reports back through
//! [`crate::CropZoom::complete_transition`] for transitions that carry a
//! [`Completion`] token.
//!
//! Starting a transition is fire-and-forget. A later transition for the same
//! property simply overrides the earlier target.

use serde::{Deserialize, Serialize};

/// Default transition duration, matching common UI timing defaults.
pub const DEFAULT_DURATION_MS: u32 = 300;

/// Timing configuration forwarded untouched with each animated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingConfig {
    pub duration_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

/// Animatable properties of the rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    TranslateX,
    TranslateY,
    Scale,
    Rotate,
    RotateX,
    RotateY,
    ContainerWidth,
    ContainerHeight,
}

/// Continuation the host must report once an animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Completion {
    /// Normalizes the stored rotation and releases the rotation guard.
    Rotation,
}

/// A single target value for the animation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub property: Property,
    pub target: f64,
    /// When false the host should assign `target` immediately.
    pub animate: bool,
    pub timing: TimingConfig,
    pub completion: Option<Completion>,
}

impl Transition {
    pub fn new(property: Property, target: f64, animate: bool, timing: TimingConfig) -> Self {
        Self {
            property,
            target,
            animate,
            timing,
            completion: None,
        }
    }

    /// Attach a completion token.
    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }
}
