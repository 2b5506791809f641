//! Bridges a plain JS callbacks object onto [`CropZoomListener`].
//!
//! ```typescript
//! const zoom = new JsCropZoom(config, {
//!   onUpdate: (state) => overlay.update(state),
//!   onPinchEnd: (success) => console.log('pinch settled', success),
//! });
//! ```
//!
//! The engine never calls into JS directly. It records events into an
//! `EventQueue` and the wrapper dispatches them to the `JsListener`
//! once the engine is no longer borrowed, so callbacks may call back into
//! the same `JsCropZoom`.
//!
//! Every callback is optional. Exceptions thrown by a callback are dropped;
//! they cannot unwind through the engine.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use cropzoom_core::{CropZoomListener, CropZoomState, Vector2D};
use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::types::to_js;

/// A listener callback recorded by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ListenerEvent {
    Update(CropZoomState),
    PanStart,
    PanEnd(bool),
    PinchStart,
    PinchEnd(bool),
    GestureEnd,
    Tap(Vector2D<f64>),
}

/// FIFO of events shared between the engine and its wrapper.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventQueue(Rc<RefCell<VecDeque<ListenerEvent>>>);

impl EventQueue {
    fn push(&self, event: ListenerEvent) {
        self.0.borrow_mut().push_back(event);
    }

    /// Take the oldest pending event. The queue is not borrowed once this
    /// returns, so events pushed while dispatching are picked up in order.
    pub(crate) fn pop(&self) -> Option<ListenerEvent> {
        self.0.borrow_mut().pop_front()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

impl CropZoomListener for EventQueue {
    fn on_update(&mut self, state: &CropZoomState) {
        self.push(ListenerEvent::Update(*state));
    }

    fn on_pan_start(&mut self) {
        self.push(ListenerEvent::PanStart);
    }

    fn on_pan_end(&mut self, success: bool) {
        self.push(ListenerEvent::PanEnd(success));
    }

    fn on_pinch_start(&mut self) {
        self.push(ListenerEvent::PinchStart);
    }

    fn on_pinch_end(&mut self, success: bool) {
        self.push(ListenerEvent::PinchEnd(success));
    }

    fn on_gesture_end(&mut self) {
        self.push(ListenerEvent::GestureEnd);
    }

    fn on_tap(&mut self, position: Vector2D<f64>) {
        self.push(ListenerEvent::Tap(position));
    }
}

pub(crate) struct JsListener {
    on_update: Option<Function>,
    on_pan_start: Option<Function>,
    on_pan_end: Option<Function>,
    on_pinch_start: Option<Function>,
    on_pinch_end: Option<Function>,
    on_gesture_end: Option<Function>,
    on_tap: Option<Function>,
}

impl JsListener {
    /// Collect the callbacks present on `callbacks`.
    ///
    /// Returns `Ok(None)` for `undefined` or `null`.
    pub(crate) fn from_value(callbacks: &JsValue) -> Result<Option<Self>, JsValue> {
        if callbacks.is_undefined() || callbacks.is_null() {
            return Ok(None);
        }
        if !callbacks.is_object() {
            return Err(JsValue::from_str("Invalid listener: expected an object"));
        }

        Ok(Some(Self {
            on_update: callback(callbacks, "onUpdate")?,
            on_pan_start: callback(callbacks, "onPanStart")?,
            on_pan_end: callback(callbacks, "onPanEnd")?,
            on_pinch_start: callback(callbacks, "onPinchStart")?,
            on_pinch_end: callback(callbacks, "onPinchEnd")?,
            on_gesture_end: callback(callbacks, "onGestureEnd")?,
            on_tap: callback(callbacks, "onTap")?,
        }))
    }

    pub(crate) fn dispatch(&self, event: ListenerEvent) {
        match event {
            ListenerEvent::Update(state) => call1(&self.on_update, || to_js(&state)),
            ListenerEvent::PanStart => call0(&self.on_pan_start),
            ListenerEvent::PanEnd(success) => {
                call1(&self.on_pan_end, || Ok(JsValue::from_bool(success)))
            }
            ListenerEvent::PinchStart => call0(&self.on_pinch_start),
            ListenerEvent::PinchEnd(success) => {
                call1(&self.on_pinch_end, || Ok(JsValue::from_bool(success)))
            }
            ListenerEvent::GestureEnd => call0(&self.on_gesture_end),
            ListenerEvent::Tap(position) => call1(&self.on_tap, || to_js(&position)),
        }
    }
}

fn callback(callbacks: &JsValue, name: &str) -> Result<Option<Function>, JsValue> {
    let value = Reflect::get(callbacks, &JsValue::from_str(name))?;
    Ok(value.dyn_into::<Function>().ok())
}

fn call0(f: &Option<Function>) {
    if let Some(f) = f {
        let _ = f.call0(&JsValue::NULL);
    }
}

fn call1(f: &Option<Function>, arg: impl FnOnce() -> Result<JsValue, JsValue>) {
    if let Some(f) = f {
        if let Ok(arg) = arg() {
            let _ = f.call1(&JsValue::NULL, &arg);
        }
    }
}
