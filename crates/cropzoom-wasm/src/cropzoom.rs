//! WASM bindings for the CropZoom state machine.
//!
//! The host forwards recognizer samples to the gesture methods, drains
//! `take_transitions()` every frame to drive its animations, and calls
//! `complete_rotation()` when an animated rotation finishes.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const zoom = new JsCropZoom(
//!   { cropSize: { width: 300, height: 300 }, resolution: { width: 1200, height: 900 } },
//!   { onUpdate: (state) => console.log(state.scale) },
//! );
//!
//! zoom.pinch_start(0, 0);
//! zoom.pinch_update(0, 0, 2);
//! zoom.pinch_end();
//!
//! zoom.rotate(true, true, (angle) => console.log('rotated to', angle));
//! const descriptor = zoom.crop(1024);
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use cropzoom_core::{
    Completion, ConfigError, CropAssignableState, CropZoom, CropZoomConfig, CropZoomHandle,
    PanSample, PinchSample, Vector2D,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::listener::{EventQueue, JsListener};
use crate::types::{from_js, to_js, JsCropDescriptor};

/// A crop and zoom engine instance for JavaScript.
///
/// Every method takes `&self` and releases the engine before any callback
/// runs, so callbacks may read from or drive the same instance.
#[wasm_bindgen]
pub struct JsCropZoom {
    inner: RefCell<CropZoom>,
    events: EventQueue,
    listener: RefCell<Option<Rc<JsListener>>>,
}

#[wasm_bindgen]
impl JsCropZoom {
    /// Create an engine from a config object and an optional callbacks
    /// object.
    ///
    /// # Errors
    ///
    /// Throws if the config cannot be parsed or fails validation.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, listener: JsValue) -> Result<JsCropZoom, JsValue> {
        let config: CropZoomConfig = from_js(config, "config")?;
        let zoom = Self::from_config(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        zoom.set_listener(listener)?;
        Ok(zoom)
    }

    /// Replace the callbacks object. `undefined` or `null` removes it.
    pub fn set_listener(&self, listener: JsValue) -> Result<(), JsValue> {
        let listener = JsListener::from_value(&listener)?;
        *self.listener.borrow_mut() = listener.map(Rc::new);
        Ok(())
    }

    // =========================================================================
    // Imperative handle
    // =========================================================================

    /// Rotate by 90°. Returns false if a previous rotation is still animating.
    ///
    /// `callback` receives the new angle in radians, normalized to `[0, 2π)`.
    pub fn rotate(&self, animate: bool, clockwise: bool, callback: Option<Function>) -> bool {
        match self.with_engine(|zoom| zoom.rotate(animate, clockwise)) {
            Some(angle) => {
                invoke(callback, angle);
                true
            }
            None => false,
        }
    }

    /// Toggle the horizontal flip and return the new angle in degrees.
    pub fn flip_horizontal(&self, animate: bool, callback: Option<Function>) -> f64 {
        let degrees = self.with_engine(|zoom| zoom.flip_horizontal(animate));
        invoke(callback, degrees);
        degrees
    }

    /// Toggle the vertical flip and return the new angle in degrees.
    pub fn flip_vertical(&self, animate: bool, callback: Option<Function>) -> f64 {
        let degrees = self.with_engine(|zoom| zoom.flip_vertical(animate));
        invoke(callback, degrees);
        degrees
    }

    pub fn reset(&self, animate: bool) {
        self.with_engine(|zoom| zoom.reset(animate));
    }

    /// Describe the visible source region. With `fixed_width` the crop
    /// rectangle is that many pixels wide in the resized source.
    pub fn crop(&self, fixed_width: Option<f64>) -> JsCropDescriptor {
        self.inner.borrow().crop(fixed_width).into()
    }

    pub fn request_state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().request_state())
    }

    /// Restore a state previously obtained from `request_state`.
    pub fn assign_state(&self, state: JsValue, animate: bool) -> Result<(), JsValue> {
        let state: CropAssignableState = from_js(state, "state")?;
        self.with_engine(|zoom| zoom.assign_state(state, animate));
        Ok(())
    }

    // =========================================================================
    // Gesture entry points
    // =========================================================================

    pub fn pan_start(&self) -> bool {
        self.with_engine(|zoom| zoom.pan_start())
    }

    /// `translation_x/y` are cumulative since the pan started.
    pub fn pan_update(&self, translation_x: f64, translation_y: f64) {
        self.with_engine(|zoom| zoom.pan_update(PanSample::new(translation_x, translation_y)));
    }

    pub fn pan_end(&self) {
        self.with_engine(|zoom| zoom.pan_end());
    }

    /// Focal coordinates are relative to the center of the crop viewport.
    pub fn pinch_start(&self, focal_x: f64, focal_y: f64) {
        self.with_engine(|zoom| {
            zoom.pinch_start(PinchSample {
                focal: Vector2D::new(focal_x, focal_y),
                scale: 1.0,
            })
        });
    }

    /// `scale` is the factor relative to the start of the pinch.
    pub fn pinch_update(&self, focal_x: f64, focal_y: f64, scale: f64) {
        self.with_engine(|zoom| {
            zoom.pinch_update(PinchSample {
                focal: Vector2D::new(focal_x, focal_y),
                scale,
            })
        });
    }

    pub fn pinch_end(&self) {
        self.with_engine(|zoom| zoom.pinch_end());
    }

    pub fn tap(&self, x: f64, y: f64) -> bool {
        self.with_engine(|zoom| zoom.tap(Vector2D::new(x, y)))
    }

    // =========================================================================
    // Animation and rendering
    // =========================================================================

    /// Drain pending transitions as an array of objects.
    pub fn take_transitions(&self) -> Result<JsValue, JsValue> {
        let transitions = self.inner.borrow_mut().take_transitions();
        to_js(&transitions)
    }

    /// Report that the animated rotation finished.
    pub fn complete_rotation(&self) {
        self.with_engine(|zoom| zoom.complete_transition(Completion::Rotation));
    }

    /// Transform list for the rendered image.
    pub fn style_transform(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().style_transform())
    }

    #[wasm_bindgen(getter)]
    pub fn container_width(&self) -> f64 {
        self.inner.borrow().container().width
    }

    #[wasm_bindgen(getter)]
    pub fn container_height(&self) -> f64 {
        self.inner.borrow().container().height
    }

    /// Width of the on-screen gesture area
    #[wasm_bindgen(getter)]
    pub fn detector_width(&self) -> f64 {
        self.inner.borrow().detector().width
    }

    /// Height of the on-screen gesture area
    #[wasm_bindgen(getter)]
    pub fn detector_height(&self) -> f64 {
        self.inner.borrow().detector().height
    }

    #[wasm_bindgen(getter)]
    pub fn max_scale(&self) -> f64 {
        self.inner.borrow().max_scale()
    }

    /// False while a pinch is in progress
    #[wasm_bindgen(getter)]
    pub fn gestures_enabled(&self) -> bool {
        self.inner.borrow().gestures_enabled()
    }
}

impl JsCropZoom {
    /// Build from an already parsed config, without a listener.
    pub fn from_config(config: CropZoomConfig) -> Result<Self, ConfigError> {
        let mut zoom = CropZoom::new(config)?;
        let events = EventQueue::default();
        zoom.set_listener(Box::new(events.clone()));
        Ok(Self {
            inner: RefCell::new(zoom),
            events,
            listener: RefCell::new(None),
        })
    }

    pub fn inner(&self) -> Ref<'_, CropZoom> {
        self.inner.borrow()
    }

    /// Run `f` against the engine, then deliver the events it recorded.
    fn with_engine<R>(&self, f: impl FnOnce(&mut CropZoom) -> R) -> R {
        let result = f(&mut self.inner.borrow_mut());
        self.flush();
        result
    }

    fn flush(&self) {
        let listener = self.listener.borrow().clone();
        while let Some(event) = self.events.pop() {
            if let Some(listener) = &listener {
                listener.dispatch(event);
            }
        }
    }
}

/// Call a completion callback. Runs after the change is committed, so an
/// exception is dropped rather than reported as a failed operation.
fn invoke(callback: Option<Function>, value: f64) {
    if let Some(callback) = callback {
        let _ = callback.call1(&JsValue::NULL, &JsValue::from_f64(value));
    }
}


/// WASM-specific tests that require JsValue.
///
/// These exercise the JS object conversions and callbacks and can only run on
/// wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::{Array, Object, Reflect};
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestSize {
        width: f64,
        height: f64,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct TestConfig {
        crop_size: TestSize,
        resolution: TestSize,
        min_scale: f64,
        pan_mode: &'static str,
    }

    fn js_config() -> JsValue {
        serde_wasm_bindgen::to_value(&TestConfig {
            crop_size: TestSize {
                width: 300.0,
                height: 300.0,
            },
            resolution: TestSize {
                width: 1200.0,
                height: 900.0,
            },
            min_scale: 1.0,
            pan_mode: "clamp",
        })
        .unwrap()
    }

    fn get(object: &JsValue, key: &str) -> JsValue {
        Reflect::get(object, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_constructor_parses_camel_case_config() {
        let zoom = JsCropZoom::new(js_config(), JsValue::UNDEFINED).unwrap();
        assert_eq!(zoom.container_width(), 400.0);
        assert_eq!(zoom.max_scale(), 3.0);
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_invalid_config() {
        let invalid = serde_wasm_bindgen::to_value(&"not a config").unwrap();
        assert!(JsCropZoom::new(invalid, JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_constructor_reports_validation_message() {
        let config = js_config();
        Reflect::set(&config, &JsValue::from_str("minScale"), &JsValue::from_f64(0.5)).unwrap();

        let err = JsCropZoom::new(config, JsValue::UNDEFINED).err().unwrap();
        assert_eq!(
            err.as_string().unwrap(),
            "minScale property must be greater than or equals one"
        );
    }

    #[wasm_bindgen_test]
    fn test_request_state_uses_camel_case() {
        let zoom = JsCropZoom::new(js_config(), JsValue::NULL).unwrap();
        let state = zoom.request_state().unwrap();

        assert_eq!(get(&state, "width").as_f64(), Some(400.0));
        assert_eq!(get(&state, "translateX").as_f64(), Some(0.0));
        assert_eq!(get(&state, "rotateY").as_f64(), Some(0.0));
    }

    #[wasm_bindgen_test]
    fn test_assign_state_round_trip() {
        let zoom = JsCropZoom::new(js_config(), JsValue::UNDEFINED).unwrap();
        let state = Object::new();
        for (key, value) in [
            ("translateX", 1000.0),
            ("translateY", 0.0),
            ("scale", 2.0),
            ("rotate", 0.0),
            ("rotateX", 0.0),
            ("rotateY", 0.0),
        ] {
            Reflect::set(&state, &JsValue::from_str(key), &JsValue::from_f64(value)).unwrap();
        }

        zoom.assign_state(state.into(), false).unwrap();
        let restored = zoom.request_state().unwrap();
        assert_eq!(get(&restored, "translateX").as_f64(), Some(250.0));
        assert_eq!(get(&restored, "scale").as_f64(), Some(2.0));
    }

    #[wasm_bindgen_test]
    fn test_rotate_invokes_callback() {
        let zoom = JsCropZoom::new(js_config(), JsValue::UNDEFINED).unwrap();
        let callback = Function::new_with_args("angle", "globalThis.__cropzoomAngle = angle;");

        assert!(zoom.rotate(false, false, Some(callback)));
        let angle = get(&js_sys::global(), "__cropzoomAngle").as_f64().unwrap();
        assert!((angle - 3.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[wasm_bindgen_test]
    fn test_listener_receives_updates() {
        let listener = Object::new();
        let on_update = Function::new_with_args(
            "state",
            "globalThis.__cropzoomScale = state.scale;",
        );
        Reflect::set(&listener, &JsValue::from_str("onUpdate"), &on_update).unwrap();

        let zoom = JsCropZoom::new(js_config(), listener.into()).unwrap();
        zoom.pinch_start(0.0, 0.0);
        zoom.pinch_update(0.0, 0.0, 2.0);

        let scale = get(&js_sys::global(), "__cropzoomScale").as_f64();
        assert_eq!(scale, Some(2.0));
    }

    #[wasm_bindgen_test]
    fn test_rotate_commits_when_callback_throws() {
        let zoom = JsCropZoom::new(js_config(), JsValue::UNDEFINED).unwrap();
        let callback = Function::new_with_args("angle", "throw new Error('callback failed');");

        assert!(zoom.rotate(false, true, Some(callback.clone())));
        assert_eq!(zoom.inner().state().rotation, std::f64::consts::FRAC_PI_2);
        assert_eq!(zoom.flip_vertical(false, Some(callback)), 180.0);
        assert!(zoom.crop(None).flip_vertical());
    }

    #[wasm_bindgen_test]
    fn test_listener_can_call_back_into_engine() {
        let listener = Object::new();
        let on_update = Function::new_with_args(
            "state",
            "globalThis.__cropzoomTransform = globalThis.__cropzoomHandle.style_transform();",
        );
        let on_gesture_end = Function::new_no_args(
            "globalThis.__cropzoomEnabled = globalThis.__cropzoomHandle.gestures_enabled;",
        );
        Reflect::set(&listener, &JsValue::from_str("onUpdate"), &on_update).unwrap();
        Reflect::set(&listener, &JsValue::from_str("onGestureEnd"), &on_gesture_end).unwrap();

        let zoom = JsCropZoom::new(js_config(), listener.into()).unwrap();
        let global = js_sys::global();
        Reflect::set(&global, &JsValue::from_str("__cropzoomHandle"), &JsValue::from(zoom))
            .unwrap();

        let drive = Function::new_no_args(
            "const zoom = globalThis.__cropzoomHandle;
             zoom.pinch_start(0, 0);
             zoom.pinch_update(0, 0, 2);
             zoom.pinch_end();",
        );
        drive.call0(&JsValue::NULL).unwrap();

        let transform = get(&global, "__cropzoomTransform");
        assert_eq!(get(&transform, "scale").as_f64(), Some(2.0));
        assert_eq!(get(&global, "__cropzoomEnabled").as_bool(), Some(true));
    }

    #[wasm_bindgen_test]
    fn test_take_transitions_drains() {
        let zoom = JsCropZoom::new(js_config(), JsValue::UNDEFINED).unwrap();
        zoom.rotate(true, true, None);

        let transitions: Array = zoom.take_transitions().unwrap().into();
        assert!(transitions.length() > 0);

        let first = transitions.get(0);
        assert!(get(&first, "property").is_string());
        assert!(get(&first, "animate").as_bool().unwrap());

        let drained: Array = zoom.take_transitions().unwrap().into();
        assert_eq!(drained.length(), 0);
    }

    #[wasm_bindgen_test]
    fn test_crop_descriptor_to_json() {
        let zoom = JsCropZoom::new(js_config(), JsValue::UNDEFINED).unwrap();
        let json = zoom.crop(None).to_json().unwrap();
        let context = get(&json, "context");
        assert_eq!(get(&context, "rotationAngle").as_f64(), Some(0.0));
        assert_eq!(get(&context, "flipHorizontal").as_bool(), Some(false));
    }
}
