//! The transform state machine.
//!
//! [`CropZoom`] is the single owner of the image transform. Gesture engines
//! only *propose* values; every write goes through a single commit step,
//! which computes the complete next state (including the rotation-derived
//! container layout) before touching any field, records the resulting
//! [`Transition`]s and notifies the listener.
//!
//! # State
//!
//! - [`GesturePhase`]: idle, panning or pinching, with the gesture baseline
//! - [`RotationPhase`]: guards against starting a rotation while an animated
//!   rotation is still in flight
//!
//! # Threading
//!
//! All methods take `&mut self` and run to completion. Animations are
//! fire-and-forget: targets are committed immediately and the host reports
//! completion with [`CropZoom::complete_transition`].

use std::f64::consts::{FRAC_PI_2, PI};

use tracing::{debug, trace};

use crate::animation::{Completion, Property, TimingConfig, Transition};
use crate::bounds::{bounds, clamp_translation};
use crate::config::{ConfigError, CropZoomConfig};
use crate::gesture::{
    pan, pinch, PanGesture, PanSample, PinchGesture, PinchOptions, PinchSample, ScaleLimits,
};
use crate::transform::{
    container_size, derive_crop, floor_to_quarter_turn, max_scale_from_resolution,
    normalize_rotation, quarter_turns, rotated_size, rotation_degrees, swaps_axes, CropParams,
};
use crate::types::{
    CropAssignableState, CropContext, CropDescriptor, CropZoomState, Size, StyleTransform,
    TransformState, Vector2D,
};

/// User callbacks fired by the state machine.
///
/// Every method has an empty default so implementors only override what
/// they need.
pub trait CropZoomListener {
    /// Called after every committed change with the new snapshot.
    fn on_update(&mut self, _state: &CropZoomState) {}
    fn on_pan_start(&mut self) {}
    /// `success` is true when the drag ended inside the bounds.
    fn on_pan_end(&mut self, _success: bool) {}
    fn on_pinch_start(&mut self) {}
    /// `success` is true when the pinch ended in range without correction.
    fn on_pinch_end(&mut self, _success: bool) {}
    /// Called after either gesture ends.
    fn on_gesture_end(&mut self) {}
    fn on_tap(&mut self, _position: Vector2D<f64>) {}
}

/// The imperative operations exposed to application code.
pub trait CropZoomHandle {
    /// Rotate by a quarter turn, resetting translation and scale.
    ///
    /// Returns the new angle normalized to `[0, 2π)`, or `None` if an
    /// animated rotation is still in flight.
    fn rotate(&mut self, animate: bool, clockwise: bool) -> Option<f64>;

    /// Toggle the horizontal flip. Returns the new flip angle in degrees.
    fn flip_horizontal(&mut self, animate: bool) -> f64;

    /// Toggle the vertical flip. Returns the new flip angle in degrees.
    fn flip_vertical(&mut self, animate: bool) -> f64;

    /// Return to the identity transform at the minimum scale.
    fn reset(&mut self, animate: bool);

    /// Describe the visible region of the source image.
    fn crop(&self, fixed_width: Option<f64>) -> CropDescriptor;

    /// Snapshot of the current (target) state.
    fn request_state(&self) -> CropZoomState;

    /// Restore a previously captured state, sanitizing every field.
    fn assign_state(&mut self, state: CropAssignableState, animate: bool);
}

/// Which gesture currently drives the transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Panning(PanGesture),
    Pinching(PinchGesture),
}

/// Rotation reentrancy guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationPhase {
    #[default]
    Idle,
    /// An animated rotation has not reported completion yet.
    Animating,
}

/// Values derived from the rotation angle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    container: Size<f64>,
    max_scale: f64,
}

/// Gesture-driven crop and zoom engine.
pub struct CropZoom {
    config: CropZoomConfig,
    state: TransformState,
    layout: Layout,
    gesture: GesturePhase,
    rotation_phase: RotationPhase,
    transitions: Vec<Transition>,
    listener: Option<Box<dyn CropZoomListener>>,
}

impl CropZoom {
    /// Validate `config` and create the engine in its identity state.
    pub fn new(config: CropZoomConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let layout = layout_for(&config, 0.0);
        debug!(
            container_width = layout.container.width,
            container_height = layout.container.height,
            max_scale = layout.max_scale,
            "crop zoom created"
        );

        Ok(Self {
            state: TransformState::identity(config.min_scale),
            config,
            layout,
            gesture: GesturePhase::Idle,
            rotation_phase: RotationPhase::Idle,
            transitions: Vec::new(),
            listener: None,
        })
    }

    /// Attach a listener, replacing any previous one.
    pub fn with_listener(mut self, listener: impl CropZoomListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn CropZoomListener>) {
        self.listener = Some(listener);
    }

    pub fn config(&self) -> &CropZoomConfig {
        &self.config
    }

    /// Current (target) transform.
    pub fn state(&self) -> TransformState {
        self.state
    }

    /// Pre-rotation rendered image box.
    pub fn container(&self) -> Size<f64> {
        self.layout.container
    }

    /// On-screen gesture detection box.
    pub fn detector(&self) -> Size<f64> {
        rotated_size(self.layout.container, self.state.rotation)
    }

    pub fn min_scale(&self) -> f64 {
        self.config.min_scale
    }

    /// Configured maximum scale, or the native-resolution limit.
    pub fn max_scale(&self) -> f64 {
        self.layout.max_scale
    }

    pub fn limits(&self) -> ScaleLimits {
        ScaleLimits {
            min: self.config.min_scale,
            max: self.layout.max_scale,
        }
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture
    }

    pub fn rotation_phase(&self) -> RotationPhase {
        self.rotation_phase
    }

    /// Pan and tap are disabled while a pinch is in progress.
    pub fn gestures_enabled(&self) -> bool {
        !matches!(self.gesture, GesturePhase::Pinching(_))
    }

    /// Translation bounds at `scale`, or at the current scale.
    pub fn bounds(&self, scale: Option<f64>) -> Vector2D<f64> {
        bounds(
            self.layout.container,
            self.config.crop_size,
            self.state.rotation,
            scale.unwrap_or(self.state.scale),
        )
    }

    /// Transform list for the rendering layer.
    pub fn style_transform(&self) -> StyleTransform {
        StyleTransform {
            translate_x: self.state.translate.x,
            translate_y: self.state.translate.y,
            scale: self.state.scale,
            rotate_z: self.state.rotation,
            rotate_x: self.state.flip.x,
            rotate_y: self.state.flip.y,
        }
    }

    /// Drain the transitions recorded since the last call.
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }

    /// Report that an animation carrying `completion` has finished.
    pub fn complete_transition(&mut self, completion: Completion) {
        match completion {
            Completion::Rotation => {
                self.rotation_phase = RotationPhase::Idle;

                let normalized = normalize_rotation(self.state.rotation);
                if normalized != self.state.rotation {
                    trace!(from = self.state.rotation, to = normalized, "rotation normalized");
                    self.state.rotation = normalized;
                    self.transitions.push(Transition::new(
                        Property::Rotate,
                        normalized,
                        false,
                        self.config.timing,
                    ));
                    self.notify_update();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Gesture entry points
    // ------------------------------------------------------------------

    /// Begin a drag. Ignored while pinching.
    pub fn pan_start(&mut self) -> bool {
        if !self.gestures_enabled() {
            trace!("pan ignored while pinching");
            return false;
        }

        self.gesture = GesturePhase::Panning(PanGesture::start(self.state.translate));
        self.emit(|l| l.on_pan_start());
        true
    }

    pub fn pan_update(&mut self, sample: PanSample) {
        let GesturePhase::Panning(gesture) = self.gesture else {
            return;
        };

        let translate = gesture.update(
            &sample,
            self.config.pan_mode,
            self.bounds(None),
            self.config.crop_size,
        );
        self.commit(
            TransformState {
                translate,
                ..self.state
            },
            false,
        );
    }

    /// Release a drag, settling the translation according to the pan mode.
    pub fn pan_end(&mut self) {
        let GesturePhase::Panning(_) = self.gesture else {
            return;
        };
        self.gesture = GesturePhase::Idle;

        let outcome = pan::settle(self.state.translate, self.config.pan_mode, self.bounds(None));
        if outcome.corrected {
            self.commit(
                TransformState {
                    translate: outcome.target,
                    ..self.state
                },
                true,
            );
        }

        trace!(success = outcome.success, "pan ended");
        self.emit(|l| l.on_pan_end(outcome.success));
        self.emit(|l| l.on_gesture_end());
    }

    /// Begin a pinch. A drag in progress is abandoned without settling.
    pub fn pinch_start(&mut self, sample: PinchSample) {
        if let GesturePhase::Panning(_) = self.gesture {
            debug!("pinch took over an active pan");
        }

        self.gesture = GesturePhase::Pinching(PinchGesture::start(
            &sample,
            self.state.translate,
            self.state.scale,
        ));
        self.emit(|l| l.on_pinch_start());
    }

    pub fn pinch_update(&mut self, sample: PinchSample) {
        let GesturePhase::Pinching(gesture) = self.gesture else {
            return;
        };

        let options = PinchOptions {
            limits: self.limits(),
            scale_mode: self.config.scale_mode,
            pan_mode: self.config.pan_mode,
            centering: self.config.pinch_centering,
            allow_panning: self.config.allow_pinch_panning,
            crop_size: self.config.crop_size,
        };
        let (scale, translate) = gesture.update(&sample, &options, |s| self.bounds(Some(s)));

        self.commit(
            TransformState {
                translate,
                scale,
                ..self.state
            },
            false,
        );
    }

    /// Release a pinch, animating scale and translation back into range.
    pub fn pinch_end(&mut self) {
        let GesturePhase::Pinching(_) = self.gesture else {
            return;
        };
        self.gesture = GesturePhase::Idle;

        let outcome = pinch::settle(
            self.state.scale,
            self.state.translate,
            self.limits(),
            self.config.pan_mode,
            |s| self.bounds(Some(s)),
        );
        if outcome.scale_corrected || outcome.translate_corrected {
            self.commit(
                TransformState {
                    translate: outcome.translate,
                    scale: outcome.scale,
                    ..self.state
                },
                true,
            );
        }

        let success = outcome.success();
        trace!(success, "pinch ended");
        self.emit(|l| l.on_pinch_end(success));
        self.emit(|l| l.on_gesture_end());
    }

    /// Forward a single tap. Ignored while pinching.
    pub fn tap(&mut self, position: Vector2D<f64>) -> bool {
        if !self.gestures_enabled() {
            return false;
        }
        self.emit(|l| l.on_tap(position));
        true
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn snapshot(&self) -> CropZoomState {
        CropZoomState {
            width: self.layout.container.width,
            height: self.layout.container.height,
            translate_x: self.state.translate.x,
            translate_y: self.state.translate.y,
            scale: self.state.scale,
            rotate: self.state.rotation,
            rotate_x: self.state.flip.x,
            rotate_y: self.state.flip.y,
        }
    }

    /// Commit `next` as the new target state.
    ///
    /// Everything is computed before any field is written. Only changed
    /// properties produce transitions.
    fn commit(&mut self, mut next: TransformState, animate: bool) {
        let timing = self.config.timing;
        let previous = self.state;

        let rotation_changed = next.rotation != previous.rotation;
        if rotation_changed && !animate {
            next.rotation = normalize_rotation(next.rotation);
        }

        let layout = layout_for(&self.config, next.rotation);

        let mut pending = Vec::new();
        if layout.container != self.layout.container {
            pending.push(Transition::new(
                Property::ContainerWidth,
                layout.container.width,
                animate,
                timing,
            ));
            pending.push(Transition::new(
                Property::ContainerHeight,
                layout.container.height,
                animate,
                timing,
            ));
        }

        let fields = [
            (Property::TranslateX, previous.translate.x, next.translate.x),
            (Property::TranslateY, previous.translate.y, next.translate.y),
            (Property::Scale, previous.scale, next.scale),
            (Property::RotateX, previous.flip.x, next.flip.x),
            (Property::RotateY, previous.flip.y, next.flip.y),
        ];
        pending.extend(
            fields
                .into_iter()
                .filter(|(_, from, to)| from != to)
                .map(|(property, _, to)| Transition::new(property, to, animate, timing)),
        );

        if rotation_changed {
            pending.push(rotation_transition(next.rotation, animate, timing));
            self.rotation_phase = if animate {
                RotationPhase::Animating
            } else {
                RotationPhase::Idle
            };
        }

        self.state = next;
        self.layout = layout;
        self.transitions.extend(pending);
        self.notify_update();
    }

    fn notify_update(&mut self) {
        let snapshot = self.snapshot();
        self.emit(|l| l.on_update(&snapshot));
    }

    fn emit(&mut self, f: impl FnOnce(&mut dyn CropZoomListener)) {
        if let Some(listener) = self.listener.as_deref_mut() {
            f(listener);
        }
    }
}

impl CropZoomHandle for CropZoom {
    fn rotate(&mut self, animate: bool, clockwise: bool) -> Option<f64> {
        if self.rotation_phase == RotationPhase::Animating {
            debug!("rotation ignored, previous rotation still animating");
            return None;
        }

        let direction = if clockwise { 1 } else { -1 };
        let to_angle = (quarter_turns(self.state.rotation) + direction) as f64 * FRAC_PI_2;

        self.commit(
            TransformState {
                translate: Vector2D::ZERO,
                scale: self.config.min_scale,
                rotation: to_angle,
                flip: self.state.flip,
            },
            animate,
        );

        let normalized = normalize_rotation(to_angle);
        debug!(angle = normalized, animate, "rotated");
        Some(normalized)
    }

    fn flip_horizontal(&mut self, animate: bool) -> f64 {
        let to_angle = toggled_flip(self.state.flip.y);
        let mut flip = self.state.flip;
        flip.y = to_angle;
        self.commit(TransformState { flip, ..self.state }, animate);
        flip_degrees(to_angle)
    }

    fn flip_vertical(&mut self, animate: bool) -> f64 {
        let to_angle = toggled_flip(self.state.flip.x);
        let mut flip = self.state.flip;
        flip.x = to_angle;
        self.commit(TransformState { flip, ..self.state }, animate);
        flip_degrees(to_angle)
    }

    fn reset(&mut self, animate: bool) {
        self.commit(TransformState::identity(self.config.min_scale), animate);
    }

    fn crop(&self, fixed_width: Option<f64>) -> CropDescriptor {
        let context = CropContext {
            rotation_angle: rotation_degrees(self.state.rotation),
            flip_horizontal: self.state.flip.y == PI,
            flip_vertical: self.state.flip.x == PI,
        };

        let result = derive_crop(&CropParams {
            scale: self.state.scale,
            crop_size: self.config.crop_size,
            resolution: self.config.resolution,
            item_size: self.layout.container,
            translation: self.state.translate,
            is_rotated: swaps_axes(self.state.rotation),
            fixed_width,
        });

        CropDescriptor {
            crop: result.crop,
            resize: result.resize,
            context,
        }
    }

    fn request_state(&self) -> CropZoomState {
        self.snapshot()
    }

    fn assign_state(&mut self, state: CropAssignableState, animate: bool) {
        let rotation = floor_to_quarter_turn(finite_or(state.rotate, 0.0));

        // Bounds and limits follow the rotation being assigned, not the
        // current one.
        let layout = layout_for(&self.config, rotation);
        let limits = ScaleLimits {
            min: self.config.min_scale,
            max: layout.max_scale,
        };
        let scale = limits.clamp(finite_or(state.scale, limits.min));

        let bound = bounds(layout.container, self.config.crop_size, rotation, scale);
        let translate = clamp_translation(
            Vector2D::new(
                finite_or(state.translate_x, 0.0),
                finite_or(state.translate_y, 0.0),
            ),
            bound,
        );

        let next = TransformState {
            translate,
            scale,
            rotation,
            flip: Vector2D::new(snap_flip(state.rotate_x), snap_flip(state.rotate_y)),
        };

        if next.scale != state.scale
            || next.translate != Vector2D::new(state.translate_x, state.translate_y)
            || next.rotation != state.rotate
        {
            debug!(
                scale = next.scale,
                translate_x = next.translate.x,
                translate_y = next.translate.y,
                rotation = next.rotation,
                "assigned state corrected"
            );
        }

        self.commit(next, animate);
    }
}

fn layout_for(config: &CropZoomConfig, rotation: f64) -> Layout {
    let container = container_size(config.crop_size, config.resolution, rotation);
    let native = max_scale_from_resolution(container, config.resolution);
    Layout {
        container,
        max_scale: config.max_scale.unwrap_or(native).max(config.min_scale),
    }
}

fn rotation_transition(target: f64, animate: bool, timing: TimingConfig) -> Transition {
    let transition = Transition::new(Property::Rotate, target, animate, timing);
    if animate {
        transition.with_completion(Completion::Rotation)
    } else {
        transition
    }
}

#[inline]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[inline]
fn toggled_flip(angle: f64) -> f64 {
    if angle != PI {
        PI
    } else {
        0.0
    }
}

/// Flip angles above the 90° midpoint snap to π, everything else to 0.
#[inline]
fn snap_flip(angle: f64) -> f64 {
    if angle > FRAC_PI_2 {
        PI
    } else {
        0.0
    }
}

#[inline]
fn flip_degrees(angle: f64) -> f64 {
    if angle == PI {
        180.0
    } else {
        0.0
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
